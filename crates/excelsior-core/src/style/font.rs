//! Font style types

use super::Color;
use crate::error::{Error, Result};
use crate::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use std::hash::{Hash, Hasher};

/// Font settings of a style record
#[derive(Debug, Clone)]
pub struct FontStyle {
    /// Font family name (e.g., "Calibri", "Arial")
    pub name: String,
    /// Font size in points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strikethrough: bool,
    pub color: Option<Color>,
    /// `<family val>` (2 = swiss)
    pub family: Option<u32>,
    pub charset: Option<u32>,
    /// `<scheme val>` ("minor" / "major")
    pub scheme: Option<String>,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
            underline: Underline::None,
            strikethrough: false,
            color: Some(Color::theme(1)),
            family: Some(2),
            charset: None,
            scheme: Some("minor".to_string()),
        }
    }
}

impl FontStyle {
    /// Size compared bitwise, with `-0.0` folded into `0.0`
    fn size_key(&self) -> u64 {
        if self.size == 0.0 {
            0
        } else {
            self.size.to_bits()
        }
    }
}

impl PartialEq for FontStyle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.size_key() == other.size_key()
            && self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.strikethrough == other.strikethrough
            && self.color == other.color
            && self.family == other.family
            && self.charset == other.charset
            && self.scheme == other.scheme
    }
}

impl Eq for FontStyle {}

impl Hash for FontStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size_key().hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
        self.strikethrough.hash(state);
        self.color.hash(state);
        self.family.hash(state);
        self.charset.hash(state);
        self.scheme.hash(state);
    }
}

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    SingleAccounting,
    DoubleAccounting,
}

impl Underline {
    /// Value of `<u val>`; `None` for no underline
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Underline::None => None,
            Underline::Single => Some("single"),
            Underline::Double => Some("double"),
            Underline::SingleAccounting => Some("singleAccounting"),
            Underline::DoubleAccounting => Some("doubleAccounting"),
        }
    }

    /// A bare `<u/>` means single
    pub fn from_val(val: Option<&str>) -> Self {
        match val {
            None | Some("single") => Underline::Single,
            Some("double") => Underline::Double,
            Some("singleAccounting") => Underline::SingleAccounting,
            Some("doubleAccounting") => Underline::DoubleAccounting,
            Some(_) => Underline::None,
        }
    }
}

/// Partial font change: only the `Some` fields are applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontPatch {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<Underline>,
    pub color: Option<Color>,
}

impl FontPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn underline(mut self, underline: Underline) -> Self {
        self.underline = Some(underline);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Reject values Excel cannot store.
    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.size {
            if !(size.is_finite() && (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size)) {
                return Err(Error::InvalidFontSize(size));
            }
        }
        Ok(())
    }

    pub fn apply(&self, base: &FontStyle) -> FontStyle {
        let mut font = base.clone();
        if let Some(name) = &self.name {
            if *name != font.name {
                // Theme scheme binds the font to the theme's face
                font.scheme = None;
            }
            font.name = name.clone();
        }
        if let Some(size) = self.size {
            font.size = size;
        }
        if let Some(bold) = self.bold {
            font.bold = bold;
        }
        if let Some(italic) = self.italic {
            font.italic = italic;
        }
        if let Some(underline) = self.underline {
            font.underline = underline;
        }
        if let Some(color) = &self.color {
            font.color = Some(color.clone());
        }
        font
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_keeps_unspecified_fields() {
        let base = FontStyle {
            italic: true,
            ..FontStyle::default()
        };
        let font = FontPatch::new().bold(true).size(14.0).apply(&base);
        assert!(font.bold);
        assert!(font.italic);
        assert_eq!(font.size, 14.0);
        assert_eq!(font.name, "Calibri");
        assert_eq!(font.scheme.as_deref(), Some("minor"));
    }

    #[test]
    fn test_equality_agrees_with_hash() {
        let hash = |font: &FontStyle| {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            font.hash(&mut hasher);
            hasher.finish()
        };
        let zero = FontStyle {
            size: 0.0,
            ..FontStyle::default()
        };
        let negative_zero = FontStyle {
            size: -0.0,
            ..FontStyle::default()
        };
        assert_eq!(zero, negative_zero);
        assert_eq!(hash(&zero), hash(&negative_zero));
        assert_ne!(FontStyle::default(), zero);
    }

    #[test]
    fn test_size_must_be_storable() {
        assert!(FontPatch::new().size(11.0).validate().is_ok());
        assert!(FontPatch::new().size(409.0).validate().is_ok());
        assert!(FontPatch::new().bold(true).validate().is_ok());
        for size in [f64::NAN, f64::INFINITY, -4.0, 0.0, 0.5, 409.5] {
            assert!(matches!(
                FontPatch::new().size(size).validate(),
                Err(Error::InvalidFontSize(_))
            ));
        }
    }

    #[test]
    fn test_renaming_drops_theme_scheme() {
        let font = FontPatch::new().name("Arial").apply(&FontStyle::default());
        assert_eq!(font.name, "Arial");
        assert_eq!(font.scheme, None);
    }
}
