//! Common imports for excelsior users
//!
//! ```rust
//! use excelsior::prelude::*;
//! ```

pub use crate::{
    // Style types
    AlignSpec,
    BorderLineStyle,
    BorderStyle,
    CellValue,
    Color,
    // Bulk input
    ColumnBatch,
    ColumnValues,
    // Main types
    Editor,
    // Errors
    Error,
    ErrorKind,
    FillStyle,
    FontPatch,
    HorizontalAlignment,
    Result,
    SaveOptions,
    Scanner,
    StylePatch,
    TypedColumn,
    VerticalAlignment,
};
