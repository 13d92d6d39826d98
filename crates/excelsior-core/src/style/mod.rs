//! Cell styling types
//!
//! This module contains types for cell formatting:
//! - [`StyleRecord`] - one combined formatting record (one `<xf>` in styles.xml)
//! - [`StylePatch`] - a partial change merged onto an existing record
//! - [`StyleTable`] - the workbook's deduplicated records
//! - [`FontStyle`], [`FillStyle`], [`BorderStyle`], [`Alignment`],
//!   [`NumberFormat`], [`Color`] - the parts of a record

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod number_format;
mod table;

pub use alignment::{AlignSpec, Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderStyle};
pub use color::Color;
pub use fill::{FillStyle, PatternType};
pub use font::{FontPatch, FontStyle, Underline};
pub use number_format::{NumberFormat, FIRST_CUSTOM_NUM_FMT_ID};
pub use table::StyleTable;

use crate::error::Result;

/// Complete formatting of a cell
///
/// Records are deduplicated by structural equality in [`StyleTable`]; cells
/// refer to them by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StyleRecord {
    pub font: FontStyle,
    pub fill: FillStyle,
    pub border: BorderStyle,
    pub alignment: Alignment,
    pub number_format: NumberFormat,
}

impl StyleRecord {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A partial formatting change.
///
/// Every `None` aspect is inherited from the record the patch is merged
/// onto, so setting a fill on a range keeps each cell's font and borders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StylePatch {
    pub font: Option<FontPatch>,
    pub fill: Option<FillStyle>,
    pub border: Option<BorderStyle>,
    pub alignment: Option<AlignSpec>,
    pub number_format: Option<NumberFormat>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, font: FontPatch) -> Self {
        self.font = Some(font);
        self
    }

    pub fn fill(mut self, fill: FillStyle) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn border(mut self, border: BorderStyle) -> Self {
        self.border = Some(border);
        self
    }

    pub fn alignment(mut self, alignment: AlignSpec) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = Some(format);
        self
    }

    /// Check every aspect before the patch touches any cell
    pub fn validate(&self) -> Result<()> {
        match &self.font {
            Some(font) => font.validate(),
            None => Ok(()),
        }
    }

    /// Build the merged record
    pub fn apply(&self, base: &StyleRecord) -> StyleRecord {
        StyleRecord {
            font: match &self.font {
                Some(patch) => patch.apply(&base.font),
                None => base.font.clone(),
            },
            fill: self.fill.clone().unwrap_or_else(|| base.fill.clone()),
            border: self.border.clone().unwrap_or_else(|| base.border.clone()),
            alignment: match &self.alignment {
                Some(spec) => spec.apply(&base.alignment),
                None => base.alignment.clone(),
            },
            number_format: self
                .number_format
                .clone()
                .unwrap_or_else(|| base.number_format.clone()),
        }
    }
}
