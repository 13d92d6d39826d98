//! Sheet storage
//!
//! Sparse row-based storage for one worksheet. Only cells that carry a
//! value, a non-default style or unknown attributes are stored.
//!
//! Structure: `BTreeMap<row_index, Row>` where a [`Row`] holds a
//! `BTreeMap<col_index, Cell>` plus the row's own XML attributes. Iteration
//! is therefore already in the order the sheet XML requires.
//!
//! The store also tracks, per column, the last row holding a non-empty value
//! so "last row" queries never rescan the sheet.

mod columns;
mod merge;

pub use columns::{validate_width, ColumnWidth, ColumnWidths};
pub use merge::MergedRegions;

use crate::address::{CellAddress, CellRange};
use crate::cell::{Cell, CellValue};
use crate::strings::SharedStringTable;
use std::collections::BTreeMap;

/// One `<row>`: its cells and the attributes other than `r`
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub cells: BTreeMap<u16, Cell>,
    /// `ht`, `customHeight`, `s`, `hidden`, ... from the source
    pub attributes: Vec<(String, String)>,
}

impl Row {
    fn is_blank(&self) -> bool {
        self.cells.is_empty() && self.attributes.is_empty()
    }
}

/// In-memory representation of one worksheet
#[derive(Debug, Default)]
pub struct SheetStore {
    rows: BTreeMap<u32, Row>,
    /// Column → last row with a non-empty value
    column_last: BTreeMap<u16, u32>,
    max_row: Option<u32>,
    columns: ColumnWidths,
    merged: MergedRegions,
    modified: bool,
}

impl SheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.rows.get(&row).and_then(|r| r.cells.get(&col))
    }

    pub fn value(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cell(row, col).map(|c| &c.value)
    }

    /// Style index of a cell (0 when the cell does not exist)
    pub fn style_at(&self, row: u32, col: u16) -> u32 {
        self.cell(row, col).map_or(0, |c| c.style)
    }

    /// Store a cell as read from the source, replacing any previous one.
    pub fn insert_cell(&mut self, row: u32, col: u16, cell: Cell) {
        let had_value = self.cell(row, col).is_some_and(|c| !c.value.is_empty());
        let has_value = !cell.value.is_empty();

        if cell.is_blank() {
            self.remove_cell(row, col);
        } else {
            self.rows.entry(row).or_default().cells.insert(col, cell);
        }
        self.track(row, col, had_value, has_value);
        self.modified = true;
    }

    /// Set the value of a cell, keeping its style.
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) {
        let had_value = self.cell(row, col).is_some_and(|c| !c.value.is_empty());
        let has_value = !value.is_empty();

        let cells = &mut self.rows.entry(row).or_default().cells;
        let cell = cells.entry(col).or_default();
        cell.value = value;
        if cell.is_blank() {
            self.remove_cell(row, col);
        }

        self.track(row, col, had_value, has_value);
        self.modified = true;
    }

    /// Set a text value through the shared string table
    pub fn set_text(&mut self, row: u32, col: u16, text: &str, strings: &mut SharedStringTable) {
        let idx = strings.internalize(text);
        self.set_value(row, col, CellValue::SharedString(idx));
    }

    /// Set the style index of a cell, creating a value-less cell if needed
    pub fn set_style(&mut self, row: u32, col: u16, style: u32) {
        let cells = &mut self.rows.entry(row).or_default().cells;
        let cell = cells.entry(col).or_default();
        cell.style = style;
        if cell.is_blank() {
            self.remove_cell(row, col);
        }
        self.modified = true;
    }

    fn remove_cell(&mut self, row: u32, col: u16) {
        if let Some(r) = self.rows.get_mut(&row) {
            r.cells.remove(&col);
            if r.is_blank() {
                self.rows.remove(&row);
            }
        }
    }

    /// Keep the per-column and sheet-wide maxima current
    fn track(&mut self, row: u32, col: u16, had_value: bool, has_value: bool) {
        if has_value {
            let last = self.column_last.entry(col).or_insert(row);
            *last = (*last).max(row);
            self.max_row = Some(self.max_row.map_or(row, |m| m.max(row)));
            return;
        }

        if !had_value || self.column_last.get(&col) != Some(&row) {
            return;
        }

        // The column's last value was cleared: look further up
        let previous = self
            .rows
            .range(..row)
            .rev()
            .find(|(_, r)| r.cells.get(&col).is_some_and(|c| !c.value.is_empty()))
            .map(|(idx, _)| *idx);
        match previous {
            Some(prev) => {
                self.column_last.insert(col, prev);
            }
            None => {
                self.column_last.remove(&col);
            }
        }
        if self.max_row == Some(row) {
            self.max_row = self.column_last.values().copied().max();
        }
    }

    /// Highest row with a non-empty value in `col`
    pub fn last_row_in_column(&self, col: u16) -> Option<u32> {
        self.column_last.get(&col).copied()
    }

    /// Highest row with a non-empty value in any of `first..=last`
    pub fn last_row_in_columns(&self, first: u16, last: u16) -> Option<u32> {
        self.column_last
            .range(first..=last)
            .map(|(_, row)| *row)
            .max()
    }

    /// Highest row with a non-empty value anywhere
    pub fn max_row(&self) -> Option<u32> {
        self.max_row
    }

    /// Bounding box of every stored cell, styled-only cells included
    pub fn dimension(&self) -> Option<CellRange> {
        let first_row = *self.rows.keys().next()?;
        let last_row = *self.rows.keys().next_back()?;
        let mut cols = self
            .rows
            .values()
            .filter_map(|r| Some((*r.cells.keys().next()?, *r.cells.keys().next_back()?)));
        let (mut min_col, mut max_col) = cols.next()?;
        for (lo, hi) in cols {
            min_col = min_col.min(lo);
            max_col = max_col.max(hi);
        }
        Some(CellRange {
            start: CellAddress::new(first_row, min_col),
            end: CellAddress::new(last_row, max_col),
        })
    }

    /// Attributes of a `<row>` read from the source
    pub fn set_row_attributes(&mut self, row: u32, attributes: Vec<(String, String)>) {
        if attributes.is_empty() && !self.rows.contains_key(&row) {
            return;
        }
        self.rows.entry(row).or_default().attributes = attributes;
    }

    /// Iterate rows in order
    pub fn rows(&self) -> impl Iterator<Item = (u32, &Row)> {
        self.rows.iter().map(|(idx, row)| (*idx, row))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.cells.len()).sum()
    }

    pub fn columns(&self) -> &ColumnWidths {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnWidths {
        self.modified = true;
        &mut self.columns
    }

    pub fn merged(&self) -> &MergedRegions {
        &self.merged
    }

    pub fn merged_mut(&mut self) -> &mut MergedRegions {
        self.modified = true;
        &mut self.merged
    }

    /// Whether anything changed since [`mark_clean`](Self::mark_clean)
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Called once a sheet has been loaded from its part
    pub fn mark_clean(&mut self) {
        self.modified = false;
    }
}
