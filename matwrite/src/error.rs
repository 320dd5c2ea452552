//! Error types for MAT-file writing.
//!
//! This module provides the [`Error`] enum covering every failure mode of
//! the writer, along with a convenient [`Result`] type alias. Every layer
//! (primitive writer, element encoder, container assembler) returns these
//! errors instead of silently skipping a write.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for MAT-file operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing a MAT-file.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the underlying sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The output file could not be created.
    #[error("Failed to create MAT file: {path}")]
    OpenFailed {
        /// Path to the file that could not be created.
        path: PathBuf,
    },

    /// The writer has already been closed.
    #[error("MAT writer has been closed")]
    FileClosed,

    /// An earlier write failed after part of a variable reached the sink,
    /// so the file can no longer be extended safely.
    #[error("MAT writer is unusable: a write starting at offset {offset} failed part way")]
    Poisoned {
        /// Offset of the variable that was left incomplete.
        offset: u64,
    },

    /// The data length does not match the declared dimensions.
    #[error("Invalid matrix dimensions: {rows}x{cols} does not match {len} elements")]
    InvalidDimensions {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
        /// Number of elements actually supplied.
        len: usize,
    },

    /// An explicit string length exceeds the supplied buffer.
    #[error("Invalid string length: {len} exceeds buffer of {available} bytes")]
    InvalidLength {
        /// Requested length.
        len: usize,
        /// Bytes available in the buffer.
        available: usize,
    },

    /// A size does not fit the format's 32-bit length or dimension fields.
    #[error("{what} too large for a MAT-file: {size}")]
    TooLarge {
        /// What overflowed (e.g. "element payload").
        what: &'static str,
        /// The offending size.
        size: usize,
    },

    /// The stream position after an element write is not where the
    /// element's framing says it should be.
    #[error("Stream position mismatch: expected {expected}, found {actual}")]
    PositionMismatch {
        /// Position implied by the element's tag and payload.
        expected: u64,
        /// Position actually reached.
        actual: u64,
    },
}

impl Error {
    /// Create an OpenFailed error for the given path.
    pub fn open_failed(path: impl Into<PathBuf>) -> Self {
        Self::OpenFailed { path: path.into() }
    }

    /// Create an InvalidDimensions error.
    pub const fn invalid_dimensions(rows: usize, cols: usize, len: usize) -> Self {
        Self::InvalidDimensions { rows, cols, len }
    }

    /// Create a TooLarge error.
    pub const fn too_large(what: &'static str, size: usize) -> Self {
        Self::TooLarge { what, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_dimensions(3, 2, 5);
        assert!(err.to_string().contains("3x2"));
        assert!(err.to_string().contains("5 elements"));

        let err = Error::too_large("element payload", 1 << 33);
        assert!(err.to_string().starts_with("element payload too large"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
