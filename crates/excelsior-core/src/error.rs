//! Error types for excelsior-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an error, as seen by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad caller input (address, range, width, name)
    Validation,
    /// A named thing (usually a sheet) does not exist
    NotFound,
    /// The source package is not a well-formed spreadsheet
    Format,
    /// Filesystem failure
    Io,
}

/// Errors that can occur in excelsior-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid column reference
    #[error("Invalid Excel column: {0:?}")]
    InvalidColumn(String),

    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid or reversed range
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Width outside (0, 255] or not finite
    #[error("Invalid column width {0}: must be finite and in (0, 255]")]
    InvalidWidth(f64),

    /// Font size outside 1..=409 points or not finite
    #[error("Invalid font size {0}: must be between 1 and 409 points")]
    InvalidFontSize(f64),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u16),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid sheet name
    #[error("Invalid sheet name {name:?}: {reason}")]
    InvalidSheetName { name: String, reason: &'static str },

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Malformed bulk input
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Unparseable colour string
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    /// Unknown border line style name
    #[error("Invalid border style: {0:?}")]
    InvalidBorderStyle(String),

    /// New merged region intersects an existing one
    #[error("Merged region {0} overlaps an existing merged region")]
    MergeOverlap(String),

    /// Structural operation not allowed in the current state
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Which bucket of the error taxonomy this falls into
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SheetNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Validation,
        }
    }
}
