//! XLSX error types

use excelsior_core::ErrorKind;
use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while reading, editing or writing a package
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Parse error
    #[error("Parse error in {part}: {message}")]
    Parse { part: String, message: String },

    /// Core error
    #[error(transparent)]
    Core(#[from] excelsior_core::Error),
}

impl XlsxError {
    pub(crate) fn parse<P: Into<String>, M: Into<String>>(part: P, message: M) -> Self {
        XlsxError::Parse {
            part: part.into(),
            message: message.into(),
        }
    }

    /// Which bucket of the error taxonomy this falls into
    pub fn kind(&self) -> ErrorKind {
        match self {
            XlsxError::Io(_) => ErrorKind::Io,
            XlsxError::Zip(zip::result::ZipError::Io(_)) => ErrorKind::Io,
            XlsxError::Xml(quick_xml::Error::Io(_)) => ErrorKind::Io,
            XlsxError::Zip(_)
            | XlsxError::Xml(_)
            | XlsxError::InvalidFormat(_)
            | XlsxError::MissingPart(_)
            | XlsxError::Parse { .. } => ErrorKind::Format,
            XlsxError::Core(e) => e.kind(),
        }
    }
}
