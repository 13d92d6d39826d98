//! Bulk ingestion
//!
//! Two distinct paths:
//! - [`SheetStore::write_text_block`] writes rows of text; every cell becomes
//!   a shared string, nothing is inferred as a number.
//! - [`SheetStore::write_columns`] writes a typed [`ColumnBatch`] as a header
//!   row followed by one row per element, keeping each column's type.
//!
//! Both only touch values: cells keep whatever style index they already had
//! and nothing outside the written block changes.

use crate::address::{CellAddress, CellRange};
use crate::cell::CellValue;
use crate::error::{Error, Result};
use crate::sheet::SheetStore;
use crate::strings::SharedStringTable;
use crate::{MAX_COLS, MAX_ROWS};

/// Homogeneous values of one column; `None` leaves the cell without a value
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Bool(Vec<Option<bool>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Int(v) => v.len(),
            ColumnValues::Float(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
            ColumnValues::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq)]
pub struct TypedColumn {
    pub name: String,
    pub values: ColumnValues,
}

impl TypedColumn {
    pub fn new<S: Into<String>>(name: S, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn ints<S: Into<String>>(name: S, values: Vec<Option<i64>>) -> Self {
        Self::new(name, ColumnValues::Int(values))
    }

    pub fn floats<S: Into<String>>(name: S, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnValues::Float(values))
    }

    pub fn texts<S: Into<String>>(name: S, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnValues::Text(values))
    }

    pub fn bools<S: Into<String>>(name: S, values: Vec<Option<bool>>) -> Self {
        Self::new(name, ColumnValues::Bool(values))
    }
}

/// Columns of equal length, ready for [`SheetStore::write_columns`]
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBatch {
    columns: Vec<TypedColumn>,
    rows: usize,
}

impl ColumnBatch {
    /// Build a batch; all columns must have the same number of values.
    pub fn new(columns: Vec<TypedColumn>) -> Result<Self> {
        let rows = columns.first().map_or(0, |c| c.values.len());
        if let Some(bad) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(Error::InvalidTable(format!(
                "column {:?} has {} values, expected {}",
                bad.name,
                bad.values.len(),
                rows
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Number of data rows (the header is not counted)
    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[TypedColumn] {
        &self.columns
    }
}

/// Check that a `rows x cols` block fits below and right of `anchor`
fn check_block(anchor: CellAddress, rows: usize, cols: usize) -> Result<Option<CellRange>> {
    if rows == 0 || cols == 0 {
        return Ok(None);
    }
    let last_row = anchor.row as u64 + rows as u64 - 1;
    let last_col = anchor.col as u64 + cols as u64 - 1;
    if last_row >= MAX_ROWS as u64 {
        return Err(Error::RowOutOfBounds(
            last_row.min(u32::MAX as u64) as u32,
            MAX_ROWS - 1,
        ));
    }
    if last_col >= MAX_COLS as u64 {
        return Err(Error::ColumnOutOfBounds(
            last_col.min(u32::MAX as u64) as u32,
            MAX_COLS - 1,
        ));
    }
    Ok(Some(CellRange {
        start: anchor,
        end: CellAddress::new(last_row as u32, last_col as u16),
    }))
}

impl SheetStore {
    /// Write rows of text with the top-left corner at `anchor`.
    ///
    /// Rows may differ in length. Returns the covered rectangle, or `None`
    /// when there was nothing to write.
    pub fn write_text_block<S: AsRef<str>>(
        &mut self,
        anchor: CellAddress,
        rows: &[Vec<S>],
        strings: &mut SharedStringTable,
    ) -> Result<Option<CellRange>> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let Some(block) = check_block(anchor, rows.len(), width)? else {
            return Ok(None);
        };

        for (r, row) in rows.iter().enumerate() {
            let row_idx = anchor.row + r as u32;
            for (c, text) in row.iter().enumerate() {
                self.set_text(row_idx, anchor.col + c as u16, text.as_ref(), strings);
            }
        }
        Ok(Some(block))
    }

    /// Write a typed batch: header row of names, then the values.
    ///
    /// Values are written straight from the column buffers, one column at a
    /// time; no row-shaped copy of the batch is built.
    pub fn write_columns(
        &mut self,
        anchor: CellAddress,
        batch: &ColumnBatch,
        strings: &mut SharedStringTable,
    ) -> Result<Option<CellRange>> {
        let Some(block) = check_block(anchor, batch.row_count() + 1, batch.columns.len())? else {
            return Ok(None);
        };

        for (c, column) in batch.columns.iter().enumerate() {
            let col = anchor.col + c as u16;
            self.set_text(anchor.row, col, &column.name, strings);

            let first = anchor.row + 1;
            match &column.values {
                ColumnValues::Int(values) => {
                    for (r, v) in values.iter().enumerate() {
                        let value = v.map_or(CellValue::Empty, |n| CellValue::Number(n as f64));
                        self.set_value(first + r as u32, col, value);
                    }
                }
                ColumnValues::Float(values) => {
                    for (r, v) in values.iter().enumerate() {
                        let value = match v {
                            Some(n) if n.is_finite() => CellValue::Number(*n),
                            _ => CellValue::Empty,
                        };
                        self.set_value(first + r as u32, col, value);
                    }
                }
                ColumnValues::Bool(values) => {
                    for (r, v) in values.iter().enumerate() {
                        let value = v.map_or(CellValue::Empty, CellValue::Boolean);
                        self.set_value(first + r as u32, col, value);
                    }
                }
                ColumnValues::Text(values) => {
                    for (r, v) in values.iter().enumerate() {
                        match v {
                            Some(text) => self.set_text(first + r as u32, col, text, strings),
                            None => self.set_value(first + r as u32, col, CellValue::Empty),
                        }
                    }
                }
            }
        }

        Ok(Some(block))
    }
}
