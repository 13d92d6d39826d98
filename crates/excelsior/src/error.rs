//! Error type of the public API

use excelsior_core::ErrorKind;
use excelsior_xlsx::XlsxError;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad input or a missing sheet
    #[error(transparent)]
    Core(excelsior_core::Error),

    /// Reading or writing the package failed
    #[error(transparent)]
    Xlsx(XlsxError),

    #[error("Workbook has no worksheets")]
    NoSheets,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Core(e) => e.kind(),
            Error::Xlsx(e) => e.kind(),
            Error::NoSheets => ErrorKind::NotFound,
        }
    }

    /// Shorthand for `kind() == ErrorKind::Validation`
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl From<excelsior_core::Error> for Error {
    fn from(e: excelsior_core::Error) -> Self {
        Error::Core(e)
    }
}

// Core errors travelling through the package layer are unwrapped so callers
// can match on them in one place.
impl From<XlsxError> for Error {
    fn from(e: XlsxError) -> Self {
        match e {
            XlsxError::Core(core) => Error::Core(core),
            other => Error::Xlsx(other),
        }
    }
}
