//! Builder for configuring a [`MatWriter`] before the header is written.
//!
//! # Example
//!
//! ```no_run
//! use matwrite::MatWriter;
//!
//! let mut writer = MatWriter::builder()
//!     .description("calibration run 7")
//!     .overwrite(false)
//!     .create("run7.mat")?;
//!
//! writer.write_string("operator", "jk")?;
//! writer.close()?;
//! # Ok::<(), matwrite::Error>(())
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::header::Header;
use crate::writer::MatWriter;

/// Configuration collected before a MAT-file is opened.
#[derive(Debug, Clone)]
pub struct MatWriterBuilder {
    /// Header written at open.
    header: Header,

    /// Whether an existing file may be truncated.
    overwrite: bool,
}

impl MatWriterBuilder {
    /// Create a builder with a current timestamp, no description, and
    /// overwriting allowed.
    pub fn new() -> Self {
        MatWriterBuilder {
            header: Header::new(),
            overwrite: true,
        }
    }

    /// Append a description to the header text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.header = self.header.with_description(description);
        self
    }

    /// Use a fixed creation timestamp instead of the current time.
    ///
    /// Useful for reproducible output.
    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.header = self.header.created_at(created);
        self
    }

    /// Allow or refuse truncating an existing file in [`create`](Self::create).
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// The header that will be written.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Create the file at `path` and write the header.
    ///
    /// # Errors
    ///
    /// - [`Error::OpenFailed`] if the parent directory does not exist
    /// - [`Error::Io`] if the file cannot be created (including an existing
    ///   file when overwriting is disabled) or the header cannot be written
    pub fn create(self, path: impl AsRef<Path>) -> Result<MatWriter<BufWriter<File>>> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(Error::open_failed(&path));
            }
        }

        let file = if self.overwrite {
            File::create(&path)
        } else {
            OpenOptions::new().write(true).create_new(true).open(&path)
        };

        let file = file.map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("Failed to create MAT file '{}': {}", path.display(), e),
            ))
        })?;

        MatWriter::start(BufWriter::new(file), &self.header, Some(path))
    }

    /// Write the header to an arbitrary sink.
    pub fn build<W: Write>(self, sink: W) -> Result<MatWriter<W>> {
        MatWriter::start(sink, &self.header, None)
    }
}

impl Default for MatWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
