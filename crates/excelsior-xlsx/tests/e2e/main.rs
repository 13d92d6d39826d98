//! End-to-end tests for excelsior-xlsx.
//!
//! Each test builds the package it needs in memory (see [`common`]), opens
//! it with [`excelsior_xlsx::Package`], edits it and inspects the archive
//! that comes out.

mod common;
mod package;
mod prefixed;
mod structure;

pub use common::*;
