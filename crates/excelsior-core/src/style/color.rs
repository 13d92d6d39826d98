//! Color representation

use crate::error::{Error, Result};
use std::fmt;

/// A color as it appears in styles.xml
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// `auto="1"` - let the application choose
    #[default]
    Auto,

    /// Explicit ARGB value
    Argb(u32),

    /// Theme color with optional tint.
    ///
    /// The tint is kept as the text found in the file so that unchanged
    /// fonts and fills are re-emitted exactly.
    Theme { index: u32, tint: Option<Box<str>> },

    /// Indexed color (legacy palette)
    Indexed(u32),
}

impl Color {
    pub const BLACK: Color = Color::Argb(0xFF00_0000);
    pub const WHITE: Color = Color::Argb(0xFFFF_FFFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Argb(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub fn theme(index: u32) -> Self {
        Color::Theme { index, tint: None }
    }

    /// Parse `"FFFF00"`, `"#FFFF00"` or `"80FFFF00"`.
    ///
    /// Six-digit values get an opaque alpha channel.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || Error::InvalidColor(hex.to_string());
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            6 => u32::from_str_radix(digits, 16)
                .map(|rgb| Color::Argb(0xFF00_0000 | rgb))
                .map_err(|_| invalid()),
            8 => u32::from_str_radix(digits, 16)
                .map(Color::Argb)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    /// `"FFRRGGBB"` for explicit colors
    pub fn to_argb_hex(&self) -> Option<String> {
        match self {
            Color::Argb(v) => Some(format!("{:08X}", v)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => write!(f, "auto"),
            Color::Argb(v) => write!(f, "{:08X}", v),
            Color::Theme { index, tint: None } => write!(f, "theme {}", index),
            Color::Theme {
                index,
                tint: Some(t),
            } => write!(f, "theme {} tint {}", index, t),
            Color::Indexed(i) => write!(f, "indexed {}", i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("FFFF00").unwrap(), Color::Argb(0xFFFF_FF00));
        assert_eq!(Color::from_hex("#ff0000").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hex("80112233").unwrap(), Color::Argb(0x8011_2233));
        assert_eq!(
            Color::from_hex("FFFF00").unwrap().to_argb_hex().as_deref(),
            Some("FFFFFF00")
        );
    }

    #[test]
    fn test_from_hex_errors() {
        assert!(Color::from_hex("").is_err());
        assert!(Color::from_hex("FFF").is_err());
        assert!(Color::from_hex("GGGGGG").is_err());
        assert!(Color::from_hex("+FFFFF").is_err());
    }
}
