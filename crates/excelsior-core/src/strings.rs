//! Shared string table
//!
//! Workbook-scoped store of cell text. Every text cell refers to an entry by
//! index. Entries are only ever appended, so an index handed out once stays
//! valid for the lifetime of the package.

use ahash::AHashMap;

#[derive(Debug, Clone)]
struct Entry {
    text: Box<str>,
    /// Inner XML of the original `<si>` for rich-text items
    raw: Option<Box<str>>,
}

/// Deduplicating, append-only string store.
#[derive(Debug, Default)]
pub struct SharedStringTable {
    entries: Vec<Entry>,
    /// Plain entries only; rich-text items are never handed out again
    index_map: AHashMap<Box<str>, u32>,
    /// Number of entries that came from the source package
    loaded: usize,
}

impl SharedStringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry read from an existing `sharedStrings.xml`.
    ///
    /// `raw` carries the original inner XML when the item is rich text;
    /// such items keep their index but are never handed out by
    /// [`internalize`](Self::internalize), since plain text written later
    /// must not pick up someone else's run formatting.
    pub fn push_loaded(&mut self, text: String, raw: Option<String>) -> u32 {
        let idx = self.entries.len() as u32;
        if raw.is_none() {
            self.index_map.entry(text.as_str().into()).or_insert(idx);
        }
        self.entries.push(Entry {
            text: text.into_boxed_str(),
            raw: raw.map(String::into_boxed_str),
        });
        self.loaded = self.entries.len();
        idx
    }

    /// Return the index for `text`, appending it if it is new.
    pub fn internalize(&mut self, text: &str) -> u32 {
        if let Some(&idx) = self.index_map.get(text) {
            return idx;
        }

        let idx = self.entries.len() as u32;
        self.index_map.insert(text.into(), idx);
        self.entries.push(Entry {
            text: text.into(),
            raw: None,
        });
        idx
    }

    /// Plain text of an entry (runs concatenated for rich text)
    pub fn get(&self, index: u32) -> Option<&str> {
        self.entries.get(index as usize).map(|e| &*e.text)
    }

    /// Original inner XML of a rich-text entry
    pub fn raw_xml(&self, index: u32) -> Option<&str> {
        self.entries
            .get(index as usize)
            .and_then(|e| e.raw.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once anything has been appended since loading.
    pub fn is_modified(&self) -> bool {
        self.entries.len() > self.loaded
    }

    /// Iterate `(text, raw)` in index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|e| (&*e.text, e.raw.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_internalize_dedups() {
        let mut sst = SharedStringTable::new();
        let a = sst.internalize("alpha");
        let b = sst.internalize("beta");
        let a2 = sst.internalize("alpha");

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(a, a2);
        assert_eq!(sst.len(), 2);
        assert_eq!(sst.get(1), Some("beta"));
    }

    #[test]
    fn test_loaded_entries_keep_indices() {
        let mut sst = SharedStringTable::new();
        sst.push_loaded("x".into(), None);
        sst.push_loaded("x".into(), None);
        assert!(!sst.is_modified());

        assert_eq!(sst.internalize("x"), 0);
        assert!(!sst.is_modified());

        assert_eq!(sst.internalize("y"), 2);
        assert!(sst.is_modified());
    }

    #[test]
    fn test_rich_text_is_not_reused() {
        let mut sst = SharedStringTable::new();
        sst.push_loaded("bold".into(), Some("<r><rPr><b/></rPr><t>bold</t></r>".into()));

        let idx = sst.internalize("bold");
        assert_eq!(idx, 1);
        assert_eq!(sst.raw_xml(0), Some("<r><rPr><b/></rPr><t>bold</t></r>"));
        assert_eq!(sst.raw_xml(1), None);
    }
}
