//! Border style types

use super::Color;
use crate::error::{Error, Result};

/// Border style for a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
    pub diagonal: Option<BorderEdge>,
    pub diagonal_up: bool,
    pub diagonal_down: bool,
}

impl BorderStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same line on all four outer edges
    pub fn all(style: BorderLineStyle, color: Option<Color>) -> Self {
        let edge = Some(BorderEdge { style, color });
        Self {
            left: edge.clone(),
            right: edge.clone(),
            top: edge.clone(),
            bottom: edge,
            ..Self::default()
        }
    }

    /// Outline from a style name such as `"thin"`; `"none"` clears all edges.
    pub fn from_name(name: &str) -> Result<Self> {
        match BorderLineStyle::parse(name)? {
            BorderLineStyle::None => Ok(Self::default()),
            style => Ok(Self::all(style, None)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none()
            && self.right.is_none()
            && self.top.is_none()
            && self.bottom.is_none()
            && self.diagonal.is_none()
    }
}

/// A single border edge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    pub color: Option<Color>,
}

impl BorderEdge {
    pub fn new(style: BorderLineStyle, color: Option<Color>) -> Self {
        Self { style, color }
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl BorderLineStyle {
    const NAMES: [(BorderLineStyle, &'static str); 14] = [
        (BorderLineStyle::None, "none"),
        (BorderLineStyle::Thin, "thin"),
        (BorderLineStyle::Medium, "medium"),
        (BorderLineStyle::Thick, "thick"),
        (BorderLineStyle::Dashed, "dashed"),
        (BorderLineStyle::Dotted, "dotted"),
        (BorderLineStyle::Double, "double"),
        (BorderLineStyle::Hair, "hair"),
        (BorderLineStyle::MediumDashed, "mediumDashed"),
        (BorderLineStyle::DashDot, "dashDot"),
        (BorderLineStyle::MediumDashDot, "mediumDashDot"),
        (BorderLineStyle::DashDotDot, "dashDotDot"),
        (BorderLineStyle::MediumDashDotDot, "mediumDashDotDot"),
        (BorderLineStyle::SlantDashDot, "slantDashDot"),
    ];

    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(s, _)| s == self)
            .map(|(_, name)| *name)
            .unwrap_or("none")
    }

    /// Case-insensitive lookup of the OOXML style name
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        Self::NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(trimmed))
            .map(|(s, _)| *s)
            .ok_or_else(|| Error::InvalidBorderStyle(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        let border = BorderStyle::from_name("thin").unwrap();
        assert_eq!(border.left.as_ref().map(|e| e.style), Some(BorderLineStyle::Thin));
        assert_eq!(border.bottom, border.top);
        assert!(border.diagonal.is_none());

        assert!(BorderStyle::from_name("none").unwrap().is_empty());
        assert_eq!(
            BorderLineStyle::parse("MEDIUMDASHED").unwrap(),
            BorderLineStyle::MediumDashed
        );
        assert!(matches!(
            BorderStyle::from_name("wavy"),
            Err(Error::InvalidBorderStyle(_))
        ));
    }
}
