//! Merged cell regions

use crate::address::CellRange;
use crate::error::{Error, Result};

/// The `<mergeCells>` of one sheet
#[derive(Debug, Clone, Default)]
pub struct MergedRegions {
    regions: Vec<CellRange>,
}

impl MergedRegions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a region read from the source, without overlap checks
    pub fn push_loaded(&mut self, range: CellRange) {
        self.regions.push(range);
    }

    /// Add a region. Single cells and regions overlapping an existing
    /// merge are rejected; re-adding an identical region is a no-op.
    pub fn add(&mut self, range: CellRange) -> Result<bool> {
        if range.start == range.end {
            return Err(Error::InvalidRange(format!(
                "cannot merge a single cell ({})",
                range
            )));
        }
        if self.regions.contains(&range) {
            return Ok(false);
        }
        if self.regions.iter().any(|r| r.overlaps(&range)) {
            return Err(Error::MergeOverlap(range.to_string()));
        }
        self.regions.push(range);
        Ok(true)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellRange> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
