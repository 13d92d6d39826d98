//! Range selectors: the textual references accepted by editing calls
//!
//! Parsing and resolution are separate steps. [`RangeRef::parse`] only looks
//! at the text; [`RangeRef::resolve`] turns the reference into concrete cells
//! using the current state of a [`SheetStore`], which matters for open ranges
//! such as `"A2:"` whose extent depends on what has been written so far.

use crate::address::{parse_column, CellAddress, CellRange};
use crate::error::{Error, Result};
use crate::sheet::SheetStore;
use std::fmt;

/// A parsed, not yet resolved, range reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRef {
    /// `B7`
    Cell(CellAddress),
    /// `A1:C10`
    Range(CellRange),
    /// `A:C` (or a bare `A`)
    Columns(ColumnSpan),
    /// `A2:` - from the cell down to the last populated row of its column
    OpenFrom(CellAddress),
}

fn is_letters(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic())
}

impl RangeRef {
    /// Parse a range reference.
    ///
    /// # Examples
    /// ```
    /// use excelsior_core::RangeRef;
    ///
    /// assert!(matches!(RangeRef::parse("A2:"), Ok(RangeRef::OpenFrom(_))));
    /// assert!(matches!(RangeRef::parse("B:D"), Ok(RangeRef::Columns(_))));
    /// assert!(RangeRef::parse("D:B").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidColumn(String::new()));
        }

        let Some((left, right)) = s.split_once(':') else {
            if is_letters(s) {
                return Ok(RangeRef::Columns(ColumnSpan::parse(s)?));
            }
            return Ok(RangeRef::Cell(CellAddress::parse(s)?));
        };

        let (left, right) = (left.trim(), right.trim());
        let invalid = || Error::InvalidRange(s.to_string());

        if right.is_empty() {
            let start = CellAddress::parse(left).map_err(|_| invalid())?;
            return Ok(RangeRef::OpenFrom(start));
        }

        if is_letters(left) && is_letters(right) {
            return ColumnSpan::parse(s).map(RangeRef::Columns);
        }

        let start = CellAddress::parse(left).map_err(|_| invalid())?;
        let end = CellAddress::parse(right).map_err(|_| invalid())?;
        let range = CellRange::new(start, end).map_err(|_| invalid())?;
        if range.start == range.end {
            Ok(RangeRef::Cell(start))
        } else {
            Ok(RangeRef::Range(range))
        }
    }

    /// Resolve to a concrete rectangle against the sheet's current contents.
    ///
    /// Returns `None` when the reference covers no cells right now: a column
    /// span with no populated rows, or an open range whose column ends above
    /// its start row.
    pub fn resolve(&self, sheet: &SheetStore) -> Option<CellRange> {
        match *self {
            RangeRef::Cell(addr) => Some(CellRange::single(addr)),
            RangeRef::Range(range) => Some(range),
            RangeRef::Columns(span) => {
                let last = sheet.last_row_in_columns(span.first, span.last)?;
                Some(CellRange {
                    start: CellAddress::new(0, span.first),
                    end: CellAddress::new(last, span.last),
                })
            }
            RangeRef::OpenFrom(start) => {
                let last = sheet.last_row_in_column(start.col)?;
                if last < start.row {
                    return None;
                }
                Some(CellRange {
                    start,
                    end: CellAddress::new(last, start.col),
                })
            }
        }
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeRef::Cell(addr) => write!(f, "{}", addr),
            RangeRef::Range(range) => write!(f, "{}", range),
            RangeRef::Columns(span) => write!(f, "{}", span),
            RangeRef::OpenFrom(addr) => write!(f, "{}:", addr),
        }
    }
}

/// An inclusive run of columns, as used by the width setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnSpan {
    pub first: u16,
    pub last: u16,
}

impl ColumnSpan {
    pub fn single(col: u16) -> Self {
        Self {
            first: col,
            last: col,
        }
    }

    /// Parse `"F"` or `"H:I"`.
    ///
    /// A bad single token is an [`Error::InvalidColumn`]; a malformed or
    /// reversed pair is an [`Error::InvalidRange`].
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once(':') {
            None => parse_column(s).map(Self::single),
            Some((a, b)) => {
                let invalid = || Error::InvalidRange(s.to_string());
                let first = parse_column(a).map_err(|_| invalid())?;
                let last = parse_column(b).map_err(|_| invalid())?;
                if first > last {
                    return Err(invalid());
                }
                Ok(Self { first, last })
            }
        }
    }

    pub fn contains(&self, col: u16) -> bool {
        col >= self.first && col <= self.last
    }

    pub fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for ColumnSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = CellAddress::column_to_letters(self.first);
        if self.first == self.last {
            write!(f, "{}", first)
        } else {
            write!(f, "{}:{}", first, CellAddress::column_to_letters(self.last))
        }
    }
}
