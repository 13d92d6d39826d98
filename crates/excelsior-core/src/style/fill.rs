//! Fill/background style types

use super::Color;

/// Fill style for cell background
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FillStyle {
    /// No fill (`patternType="none"`)
    #[default]
    None,

    /// Pattern fill; a solid fill is the `Solid` pattern with a foreground color
    Pattern {
        pattern: PatternType,
        foreground: Option<Color>,
        background: Option<Color>,
    },

    /// A fill this crate does not model (gradients), kept as its original XML
    Raw(Box<str>),
}

impl FillStyle {
    /// Create a solid fill with the given color
    pub fn solid(color: Color) -> Self {
        FillStyle::Pattern {
            pattern: PatternType::Solid,
            foreground: Some(color),
            background: None,
        }
    }

    /// The second mandatory fill in every styles.xml
    pub fn gray125() -> Self {
        FillStyle::Pattern {
            pattern: PatternType::Gray125,
            foreground: None,
            background: None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FillStyle::None)
    }
}

/// Pattern fill types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatternType {
    #[default]
    None,
    Solid,
    MediumGray,
    DarkGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
    Gray125,
    Gray0625,
}

impl PatternType {
    const NAMES: [(PatternType, &'static str); 19] = [
        (PatternType::None, "none"),
        (PatternType::Solid, "solid"),
        (PatternType::MediumGray, "mediumGray"),
        (PatternType::DarkGray, "darkGray"),
        (PatternType::LightGray, "lightGray"),
        (PatternType::DarkHorizontal, "darkHorizontal"),
        (PatternType::DarkVertical, "darkVertical"),
        (PatternType::DarkDown, "darkDown"),
        (PatternType::DarkUp, "darkUp"),
        (PatternType::DarkGrid, "darkGrid"),
        (PatternType::DarkTrellis, "darkTrellis"),
        (PatternType::LightHorizontal, "lightHorizontal"),
        (PatternType::LightVertical, "lightVertical"),
        (PatternType::LightDown, "lightDown"),
        (PatternType::LightUp, "lightUp"),
        (PatternType::LightGrid, "lightGrid"),
        (PatternType::LightTrellis, "lightTrellis"),
        (PatternType::Gray125, "gray125"),
        (PatternType::Gray0625, "gray0625"),
    ];

    /// Value of the `patternType` attribute
    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(p, _)| p == self)
            .map(|(_, name)| *name)
            .unwrap_or("none")
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(p, _)| *p)
    }
}
