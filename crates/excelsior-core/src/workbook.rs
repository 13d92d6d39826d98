//! Workbook-level sheet list and naming rules

use crate::error::{Error, Result};
use crate::MAX_SHEET_NAME_LEN;

const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// Trim and validate a sheet name, returning the trimmed form.
///
/// Names must be non-empty, at most 31 characters, and free of
/// `: \ / ? * [ ]`.
pub fn validate_sheet_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let invalid = |reason| Error::InvalidSheetName {
        name: name.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(invalid("name is longer than 31 characters"));
    }
    if trimmed.contains(INVALID_CHARS) {
        return Err(invalid("name cannot contain any of : \\ / ? * [ ]"));
    }
    Ok(trimmed)
}

/// One `<sheet>` entry of workbook.xml
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub name: String,
    /// `sheetId`, unique and never reused within a workbook
    pub sheet_id: u32,
    /// `r:id` pointing into the workbook relationships
    pub rel_id: String,
    /// Resolved part name, e.g. `xl/worksheets/sheet1.xml`
    pub part: String,
    /// `state` (`hidden` / `veryHidden`) when present
    pub state: Option<String>,
}

/// Ordered sheet list with case-insensitive unique names
#[derive(Debug, Clone, Default)]
pub struct SheetList {
    sheets: Vec<SheetRef>,
}

impl SheetList {
    pub fn new(sheets: Vec<SheetRef>) -> Self {
        Self { sheets }
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SheetRef> {
        self.sheets.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn get(&self, index: usize) -> Option<&SheetRef> {
        self.sheets.get(index)
    }

    /// Lookup by name, ignoring case as Excel does
    pub fn find(&self, name: &str) -> Option<&SheetRef> {
        self.sheets.iter().find(|s| same_name(&s.name, name))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| same_name(&s.name, name))
    }

    /// Validate a new name against the naming rules and existing sheets.
    /// `except` names a sheet being renamed.
    pub fn check_new_name<'a>(&self, name: &'a str, except: Option<&str>) -> Result<&'a str> {
        let name = validate_sheet_name(name)?;
        let clash = self
            .sheets
            .iter()
            .filter(|s| !except.is_some_and(|old| same_name(&s.name, old)))
            .any(|s| same_name(&s.name, name));
        if clash {
            return Err(Error::DuplicateSheetName(name.to_string()));
        }
        Ok(name)
    }

    /// Next free `sheetId`
    pub fn next_sheet_id(&self) -> u32 {
        self.sheets.iter().map(|s| s.sheet_id).max().unwrap_or(0) + 1
    }

    /// Insert at `index` (clamped to the end)
    pub fn insert(&mut self, index: usize, sheet: SheetRef) -> usize {
        let index = index.min(self.sheets.len());
        self.sheets.insert(index, sheet);
        index
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let new = self.check_new_name(new, Some(old))?.to_string();
        let sheet = self
            .sheets
            .iter_mut()
            .find(|s| same_name(&s.name, old))
            .ok_or_else(|| Error::SheetNotFound(old.to_string()))?;
        sheet.name = new;
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<SheetRef> {
        let idx = self
            .position(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))?;
        if self.sheets.len() == 1 {
            return Err(Error::other("cannot delete the only worksheet"));
        }
        Ok(self.sheets.remove(idx))
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
