//! Read-only entry point over a workbook file

use std::path::Path;

use excelsior_xlsx::Package;

use crate::editor::Editor;
use crate::error::{Error, Result};

/// Lists the sheets of a workbook without parsing any of them.
///
/// Only `[Content_Types].xml`, the relationships and `workbook.xml` are
/// read when a scanner is opened.
#[derive(Debug)]
pub struct Scanner {
    package: Package,
}

impl Scanner {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            package: Package::open(path)?,
        })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(Self {
            package: Package::from_bytes(bytes)?,
        })
    }

    /// Sheet names in workbook order
    pub fn get_sheets(&self) -> Vec<String> {
        self.package.sheet_names()
    }

    /// Turn the scanner into an [`Editor`] on `sheet`, or on the first
    /// sheet when `None`.
    pub fn open_editor(self, sheet: Option<&str>) -> Result<Editor> {
        let name = match sheet {
            Some(name) => name.to_string(),
            None => self
                .package
                .sheets()
                .get(0)
                .map(|s| s.name.clone())
                .ok_or(Error::NoSheets)?,
        };
        Editor::from_package(self.package, &name)
    }
}
