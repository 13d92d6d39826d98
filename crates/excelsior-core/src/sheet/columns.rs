//! Column width intervals
//!
//! Mirrors the `<cols>` element: a sorted list of non-overlapping
//! `{min, max, width}` runs. Setting a width over part of an existing run
//! splits it; adjacent runs that end up identical are merged again.

use crate::error::{Error, Result};
use crate::MAX_COLUMN_WIDTH;
use std::collections::BTreeMap;

/// One `<col>` run. Columns are 0-based here and 1-based in the XML.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWidth {
    pub first: u16,
    pub last: u16,
    pub width: Option<f64>,
    /// Remaining `<col>` attributes (`style`, `hidden`, `customWidth`, ...)
    pub attributes: Vec<(String, String)>,
}

impl ColumnWidth {
    fn same_settings(&self, other: &ColumnWidth) -> bool {
        self.width.map(f64::to_bits) == other.width.map(f64::to_bits)
            && self.attributes == other.attributes
    }

    fn with_span(&self, first: u16, last: u16) -> Self {
        Self {
            first,
            last,
            ..self.clone()
        }
    }
}

/// Check that a width is finite and in `(0, 255]`
pub fn validate_width(width: f64) -> Result<f64> {
    if width.is_finite() && width > 0.0 && width <= MAX_COLUMN_WIDTH {
        Ok(width)
    } else {
        Err(Error::InvalidWidth(width))
    }
}

/// Non-overlapping column runs keyed by first column
#[derive(Debug, Clone, Default)]
pub struct ColumnWidths {
    runs: BTreeMap<u16, ColumnWidth>,
}

impl ColumnWidths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run read from the source sheet.
    ///
    /// Source files occasionally carry overlapping `<col>` entries; they are
    /// folded in with the same last-wins rule as [`set`](Self::set).
    pub fn push_loaded(&mut self, run: ColumnWidth) {
        if run.first > run.last {
            log::warn!("skipping <col> with min > max ({} > {})", run.first, run.last);
            return;
        }
        self.carve(run.first, run.last);
        self.runs.insert(run.first, run);
        self.coalesce();
    }

    /// Set `width` on columns `first..=last`, overriding only that span.
    ///
    /// Attributes of runs that are partially covered (a column style, for
    /// instance) are kept on the covered part.
    pub fn set(&mut self, first: u16, last: u16, width: f64) -> Result<()> {
        let width = validate_width(width)?;
        if first > last {
            return Err(Error::InvalidRange(format!("{}:{}", first, last)));
        }

        let covered = self.carve(first, last);

        let mut next = first;
        let mut pieces = Vec::with_capacity(covered.len() + 1);
        for mut piece in covered {
            if piece.first > next {
                pieces.push(fresh_run(next, piece.first - 1, width));
            }
            next = piece.last.saturating_add(1);
            piece.width = Some(width);
            set_attr(&mut piece.attributes, "customWidth", "1");
            pieces.push(piece);
        }
        if pieces.last().map_or(true, |p| p.last < last) {
            pieces.push(fresh_run(next, last, width));
        }

        for piece in pieces {
            self.runs.insert(piece.first, piece);
        }
        self.coalesce();
        Ok(())
    }

    /// Remove every run overlapping `first..=last`, re-inserting the parts
    /// outside the span, and return the parts inside it in column order.
    fn carve(&mut self, first: u16, last: u16) -> Vec<ColumnWidth> {
        let overlapping: Vec<u16> = self
            .runs
            .range(..=last)
            .filter(|(_, run)| run.last >= first)
            .map(|(start, _)| *start)
            .collect();

        let mut inside = Vec::with_capacity(overlapping.len());
        for start in overlapping {
            let Some(run) = self.runs.remove(&start) else {
                continue;
            };
            if run.first < first {
                self.runs.insert(run.first, run.with_span(run.first, first - 1));
            }
            if run.last > last {
                self.runs.insert(last + 1, run.with_span(last + 1, run.last));
            }
            inside.push(run.with_span(run.first.max(first), run.last.min(last)));
        }
        inside
    }

    fn coalesce(&mut self) {
        let runs = std::mem::take(&mut self.runs);
        let mut merged: Vec<ColumnWidth> = Vec::with_capacity(runs.len());
        for run in runs.into_values() {
            match merged.last_mut() {
                Some(prev) if prev.last as u32 + 1 == run.first as u32 && prev.same_settings(&run) => {
                    prev.last = run.last;
                }
                _ => merged.push(run),
            }
        }
        self.runs = merged.into_iter().map(|r| (r.first, r)).collect();
    }

    /// Effective width of one column
    pub fn width(&self, col: u16) -> Option<f64> {
        self.runs
            .range(..=col)
            .next_back()
            .filter(|(_, run)| run.last >= col)
            .and_then(|(_, run)| run.width)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnWidth> {
        self.runs.values()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

fn fresh_run(first: u16, last: u16, width: f64) -> ColumnWidth {
    ColumnWidth {
        first,
        last,
        width: Some(width),
        attributes: vec![("customWidth".to_string(), "1".to_string())],
    }
}

fn set_attr(attrs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match attrs.iter_mut().find(|(k, _)| k == key) {
        Some((_, v)) => *v = value.to_string(),
        None => attrs.push((key.to_string(), value.to_string())),
    }
}
