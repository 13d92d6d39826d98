//! # excelsior-core
//!
//! Core data structures for the excelsior spreadsheet editor.
//!
//! This crate holds everything that does not touch a file:
//! - [`CellAddress`], [`CellRange`] and [`RangeRef`] - the address grammar
//! - [`SharedStringTable`] - deduplicated cell text
//! - [`StyleTable`] and [`StyleRecord`] - deduplicated cell formatting
//! - [`SheetStore`] - sparse cells plus column width intervals for one worksheet
//! - [`ColumnBatch`] - typed, column-oriented input for bulk loads
//!
//! ## Example
//!
//! ```rust
//! use excelsior_core::{CellValue, RangeRef, SharedStringTable, SheetStore};
//!
//! let mut strings = SharedStringTable::new();
//! let mut sheet = SheetStore::new();
//!
//! sheet.set_text(0, 0, "name", &mut strings);
//! sheet.set_text(1, 0, "alpha", &mut strings);
//! sheet.set_value(1, 1, CellValue::Number(10.0));
//!
//! assert_eq!(sheet.last_row_in_column(0), Some(1));
//!
//! // Open ranges are resolved against the sheet at call time
//! let range = RangeRef::parse("A2:").unwrap().resolve(&sheet).unwrap();
//! assert_eq!(range.to_string(), "A2");
//! ```

pub mod address;
pub mod bulk;
pub mod cell;
pub mod error;
pub mod selector;
pub mod sheet;
pub mod strings;
pub mod style;
pub mod workbook;

pub use address::{parse_column, CellAddress, CellRange};
pub use bulk::{ColumnBatch, ColumnValues, TypedColumn};
pub use cell::{Cell, CellValue, FormulaCell};
pub use error::{Error, ErrorKind, Result};
pub use selector::{ColumnSpan, RangeRef};
pub use sheet::{validate_width, ColumnWidth, ColumnWidths, MergedRegions, Row, SheetStore};
pub use strings::SharedStringTable;
pub use style::{
    AlignSpec, Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontPatch,
    FontStyle, HorizontalAlignment, NumberFormat, PatternType, StylePatch, StyleRecord, StyleTable,
    Underline, VerticalAlignment,
};
pub use workbook::{validate_sheet_name, SheetList, SheetRef};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Widest column Excel accepts, in character units
pub const MAX_COLUMN_WIDTH: f64 = 255.0;

/// Font sizes Excel accepts, in points
pub const MIN_FONT_SIZE: f64 = 1.0;
pub const MAX_FONT_SIZE: f64 = 409.0;
