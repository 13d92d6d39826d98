//! Style table for deduplication

use super::{StylePatch, StyleRecord};
use ahash::AHashMap;

/// Deduplicated style records of a workbook
///
/// Index 0 is the default record and is never removed. Records loaded from
/// an existing styles.xml keep their original positions even when two of
/// them compare equal, since cells in untouched sheets refer to them.
#[derive(Debug)]
pub struct StyleTable {
    records: Vec<StyleRecord>,
    index_map: AHashMap<StyleRecord, u32>,
    /// Records that came from the source package
    loaded: usize,
}

impl StyleTable {
    /// Create a new table with the default record at index 0
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    /// Seed the table with records parsed from `cellXfs`, in order.
    pub fn from_records(mut records: Vec<StyleRecord>) -> Self {
        if records.is_empty() {
            records.push(StyleRecord::default());
        }

        let mut index_map = AHashMap::with_capacity(records.len().max(64));
        for (i, record) in records.iter().enumerate() {
            index_map.entry(record.clone()).or_insert(i as u32);
        }

        Self {
            loaded: records.len(),
            records,
            index_map,
        }
    }

    /// Get or create a record, returning its index
    pub fn internalize(&mut self, record: StyleRecord) -> u32 {
        if let Some(&idx) = self.index_map.get(&record) {
            return idx;
        }

        let idx = self.records.len() as u32;
        self.index_map.insert(record.clone(), idx);
        self.records.push(record);
        idx
    }

    /// Merge `patch` onto the record at `base` and internalize the result.
    ///
    /// An out-of-range `base` (a dangling `s` attribute in a source sheet)
    /// is treated as the default record.
    pub fn merge_partial(&mut self, base: u32, patch: &StylePatch) -> u32 {
        let merged = match self.records.get(base as usize) {
            Some(record) => patch.apply(record),
            None => {
                log::warn!("style index {} out of range, merging onto default", base);
                patch.apply(&self.records[0])
            }
        };
        self.internalize(merged)
    }

    pub fn get(&self, index: u32) -> Option<&StyleRecord> {
        self.records.get(index as usize)
    }

    pub fn default_record(&self) -> &StyleRecord {
        &self.records[0]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false: the default record is always present
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records that came from the source package
    pub fn loaded_len(&self) -> usize {
        self.loaded
    }

    pub fn is_modified(&self) -> bool {
        self.records.len() > self.loaded
    }

    /// Iterate over all records with their indices
    pub fn iter(&self) -> impl Iterator<Item = (u32, &StyleRecord)> {
        self.records.iter().enumerate().map(|(i, s)| (i as u32, s))
    }

    /// Records appended since loading
    pub fn added(&self) -> impl Iterator<Item = (u32, &StyleRecord)> {
        self.iter().skip(self.loaded)
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BorderStyle, Color, FillStyle, FontPatch, FontStyle};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_record() {
        let table = StyleTable::new();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0), Some(&StyleRecord::default()));
        assert!(!table.is_modified());
    }

    #[test]
    fn test_deduplication() {
        let mut table = StyleTable::new();
        let bold = StylePatch::new().font(FontPatch::new().bold(true));
        let italic = StylePatch::new().font(FontPatch::new().italic(true));

        let idx1 = table.merge_partial(0, &bold);
        let idx2 = table.merge_partial(0, &bold);
        let idx3 = table.merge_partial(0, &italic);

        assert_eq!(idx1, idx2);
        assert_ne!(idx1, idx3);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_merge_back_to_existing_record() {
        let mut table = StyleTable::new();
        let yellow = StylePatch::new().fill(FillStyle::solid(Color::rgb(255, 255, 0)));
        let cleared = StylePatch::new().fill(FillStyle::None);

        let filled = table.merge_partial(0, &yellow);
        assert_eq!(table.merge_partial(filled, &cleared), 0);
    }

    #[test]
    fn test_per_cell_merge_lands_on_distinct_records() {
        let mut table = StyleTable::new();
        let bold = table.merge_partial(0, &StylePatch::new().font(FontPatch::new().bold(true)));

        let border = StylePatch::new().border(BorderStyle::from_name("thin").unwrap());
        let a = table.merge_partial(0, &border);
        let b = table.merge_partial(bold, &border);

        assert_ne!(a, b);
        assert!(table.get(b).map(|r| r.font.bold).unwrap_or(false));
        assert_eq!(table.added().count(), 3);
    }

    #[test]
    fn test_loaded_duplicates_keep_positions() {
        let table = StyleTable::from_records(vec![
            StyleRecord::default(),
            StyleRecord::default(),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.loaded_len(), 2);
    }

    #[test]
    fn test_lookup_is_by_value() {
        let sized = |size: f64| StyleRecord {
            font: FontStyle {
                size,
                ..FontStyle::default()
            },
            ..StyleRecord::default()
        };
        let mut table = StyleTable::from_records(vec![
            StyleRecord::default(),
            StyleRecord::default(),
        ]);
        assert_eq!(table.internalize(StyleRecord::default()), 0);

        let zero = table.internalize(sized(0.0));
        assert_eq!(table.internalize(sized(-0.0)), zero);
        assert_eq!(table.internalize(sized(12.0)), zero + 1);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_dangling_base_uses_default() {
        let mut table = StyleTable::new();
        let idx = table.merge_partial(99, &StylePatch::new());
        assert_eq!(idx, 0);
    }
}
