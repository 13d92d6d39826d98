//! Output archive assembly
//!
//! The package decides which parts are regenerated; this module owns the
//! zip side: compression settings, raw copies of untouched entries and
//! fresh entries for regenerated ones.

use std::io::{Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::XlsxResult;

/// Compression used for regenerated parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

/// Options for [`Package::save`](crate::Package::save)
///
/// Only parts that are regenerated use these settings. Untouched parts are
/// copied with their original compressed bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveOptions {
    pub compression: Compression,
    /// Deflate level (0-9); `None` uses the zip crate's default
    pub compression_level: Option<i64>,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn compression_level(mut self, level: i64) -> Self {
        self.compression_level = Some(level);
        self
    }

    fn file_options(&self) -> SimpleFileOptions {
        match self.compression {
            Compression::Deflated => SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(self.compression_level),
            Compression::Stored => {
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
            }
        }
    }
}

/// Thin wrapper over [`ZipWriter`] carrying the options for new entries
pub(crate) struct PackageWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    regenerated: usize,
    copied: usize,
}

impl<W: Write + Seek> PackageWriter<W> {
    pub(crate) fn new(inner: W, options: &SaveOptions) -> Self {
        Self {
            zip: ZipWriter::new(inner),
            options: options.file_options(),
            regenerated: 0,
            copied: 0,
        }
    }

    /// Copy entry `index` of `source` without decompressing it
    pub(crate) fn copy_raw<R: Read + Seek>(
        &mut self,
        source: &mut ZipArchive<R>,
        index: usize,
    ) -> XlsxResult<()> {
        let file = source.by_index_raw(index)?;
        self.zip.raw_copy_file(file)?;
        self.copied += 1;
        Ok(())
    }

    /// Start a regenerated entry; write its body into the returned writer
    pub(crate) fn start(&mut self, name: &str) -> XlsxResult<&mut ZipWriter<W>> {
        log::debug!("regenerating {}", name);
        self.zip.start_file(name, self.options)?;
        self.regenerated += 1;
        Ok(&mut self.zip)
    }

    pub(crate) fn write_part(&mut self, name: &str, body: &[u8]) -> XlsxResult<()> {
        self.start(name)?.write_all(body)?;
        Ok(())
    }

    pub(crate) fn finish(self) -> XlsxResult<W> {
        log::debug!(
            "package written: {} parts regenerated, {} copied",
            self.regenerated,
            self.copied
        );
        Ok(self.zip.finish()?)
    }
}
