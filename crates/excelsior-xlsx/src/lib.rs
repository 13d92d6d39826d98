//! # excelsior-xlsx
//!
//! Format-preserving XLSX package layer for excelsior.
//!
//! A [`Package`] keeps the source archive in memory and only parses what is
//! asked for: the sheet list on open, a worksheet the first time it is
//! edited, the shared strings and styles when the first sheet is edited.
//! On save every part nobody touched is copied into the new archive as its
//! raw compressed bytes; only changed parts are regenerated.

pub mod content_types;
pub mod error;
pub mod package;
pub mod relationships;
pub mod shared_strings;
pub mod styles;
pub mod template;
pub mod workbook;
pub mod worksheet;
pub mod writer;

mod xml;

pub use error::{XlsxError, XlsxResult};
pub use package::{Package, SheetContext};
pub use writer::{Compression, SaveOptions};

/// Relationship and content type identifiers used across the package
pub mod ns {
    pub const MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
    pub const REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    pub const PACKAGE_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    pub const CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";

    pub const REL_OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const REL_WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
    pub const REL_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const REL_SHARED_STRINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
    pub const REL_CALC_CHAIN: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/calcChain";

    pub const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const CT_XML: &str = "application/xml";
    pub const CT_WORKBOOK: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
    pub const CT_WORKSHEET: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
    pub const CT_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
    pub const CT_SHARED_STRINGS: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml";
}
