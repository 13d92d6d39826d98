//! # excelsior
//!
//! Format-preserving editing of Excel (`.xlsx`) workbooks.
//!
//! Excelsior opens a workbook without parsing its sheets, materializes a
//! sheet only when it is edited and, on save, copies every part that was not
//! touched byte for byte. Cells, styles and column widths you did not ask to
//! change stay exactly as they were, which makes it suitable for filling
//! large, hand-formatted templates.
//!
//! ## Features
//!
//! - Text, number, boolean and formula cells
//! - Fonts, fills, borders, alignment and number formats, merged onto
//!   whatever formatting a cell already has
//! - Column widths for single columns, runs and lists of both
//! - Fast bulk loads of text tables and typed column batches
//! - Adding, renaming and deleting worksheets
//!
//! ## Example
//!
//! ```no_run
//! use excelsior::{AlignSpec, HorizontalAlignment};
//!
//! let mut editor = excelsior::create("out.xlsx", "Data")?;
//! editor.append_table_at("A1", &[
//!     vec!["name", "value"],
//!     vec!["alpha", "10"],
//!     vec!["beta", "20"],
//! ])?;
//! editor.set_alignment("A2:", AlignSpec::new().horizontal(HorizontalAlignment::Center))?;
//! editor.set_column_widths([("A", 18.5), ("B:D", 22.0)])?;
//! editor.save("out.xlsx")?;
//!
//! let scanner = excelsior::scan("out.xlsx")?;
//! assert_eq!(scanner.get_sheets(), vec!["Data"]);
//! # Ok::<(), excelsior::Error>(())
//! ```

pub mod editor;
pub mod error;
pub mod prelude;
pub mod scanner;

pub use editor::Editor;
pub use error::{Error, Result};
pub use scanner::Scanner;

// Re-export core types
pub use excelsior_core::{
    AlignSpec, BorderEdge, BorderLineStyle, BorderStyle, CellAddress, CellRange, CellValue, Color,
    ColumnBatch, ColumnSpan, ColumnValues, ErrorKind, FillStyle, FontPatch, HorizontalAlignment,
    NumberFormat, PatternType, RangeRef, StylePatch, StyleRecord, TypedColumn, Underline,
    VerticalAlignment, MAX_COLS, MAX_COLUMN_WIDTH, MAX_ROWS, MAX_SHEET_NAME_LEN,
};
pub use excelsior_xlsx::{Compression, SaveOptions, XlsxError};

use std::path::Path;

/// Write a new workbook with one empty sheet named `sheet` and return an
/// editor on it
pub fn create<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Editor> {
    Editor::create(path, sheet)
}

/// Open a workbook for listing its sheets
pub fn scan<P: AsRef<Path>>(path: P) -> Result<Scanner> {
    Scanner::open(path)
}
