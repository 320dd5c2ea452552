//! MAT-file writer handle.
//!
//! `MatWriter` is obtained from [`MatWriter::create`] or
//! [`MatWriterBuilder`] and owns the output stream for the lifetime of the
//! file. Each `write_*` method appends one top-level variable.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::builder::MatWriterBuilder;
use crate::byte_order::ByteOrder;
use crate::cell::{self, CellValue};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::matrix;
use crate::primitive::TrackedWriter;

/// Active writer for a MAT-file.
///
/// Writes take `&mut self`, so a writer has exactly one user at a time.
/// The stream is flushed and released by [`close()`](Self::close), by
/// [`into_inner()`](Self::into_inner), or on drop.
///
/// # Example
///
/// ```no_run
/// use matwrite::{CellValue, MatWriter};
///
/// let mut writer = MatWriter::create("results.mat", Some("sweep 3"))?;
///
/// // 2 rows, 3 columns, given row by row
/// let data = vec![
///     1.0, 2.0, 3.0,
///     4.0, 5.0, 6.0,
/// ];
/// writer.write_matrix_row_major("gains", 2, 3, &data)?;
/// writer.write_string("unit", "dB")?;
/// writer.write_cell_list("notes", &[CellValue::from("ok"), CellValue::from(0.5)])?;
///
/// writer.close()?;
/// # Ok::<(), matwrite::Error>(())
/// ```
pub struct MatWriter<W: Write> {
    /// Output stream; `None` once closed.
    stream: Option<TrackedWriter<W>>,

    /// Path to the file, when writing to one.
    path: Option<PathBuf>,

    /// Byte order of the host, detected at open.
    host_order: ByteOrder,

    /// Count of top-level variables written.
    variable_count: usize,

    /// Start offset of a variable left half-written by a failed write.
    poisoned_at: Option<u64>,
}

impl MatWriter<BufWriter<File>> {
    /// Start configuring a new writer.
    pub fn builder() -> MatWriterBuilder {
        MatWriterBuilder::new()
    }

    /// Create a MAT-file and write its header.
    ///
    /// The header text carries the current UTC time and, when given,
    /// `description`.
    ///
    /// # Errors
    ///
    /// - [`Error::OpenFailed`] if the parent directory does not exist
    /// - [`Error::Io`] if the file cannot be created or written
    pub fn create(path: impl AsRef<Path>, description: Option<&str>) -> Result<Self> {
        let mut builder = MatWriterBuilder::new();
        if let Some(description) = description {
            builder = builder.description(description);
        }
        builder.create(path)
    }
}

impl<W: Write> MatWriter<W> {
    /// Write the header to `sink` and wrap it (called by the builder).
    pub(crate) fn start(sink: W, header: &Header, path: Option<PathBuf>) -> Result<Self> {
        let host_order = ByteOrder::host();
        if host_order.needs_swap() {
            debug!(
                "host is {}, values will be written {}",
                host_order,
                ByteOrder::FILE
            );
        }

        let mut stream = TrackedWriter::new(sink);
        header.write_to(&mut stream)?;

        match &path {
            Some(path) => debug!("opened MAT file {}", path.display()),
            None => debug!("opened MAT stream"),
        }

        Ok(MatWriter {
            stream: Some(stream),
            path,
            host_order,
            variable_count: 0,
            poisoned_at: None,
        })
    }

    /// Whether the writer is open and accepting variables.
    ///
    /// Becomes `false` after [`close()`](Self::close), and after a write
    /// that failed once part of its variable had reached the sink.
    pub fn is_ok(&self) -> bool {
        self.stream.is_some() && self.poisoned_at.is_none()
    }

    /// Get the file path, when writing to a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current stream position, or `None` once closed.
    pub fn position(&self) -> Option<u64> {
        self.stream.as_ref().map(TrackedWriter::position)
    }

    /// Get the number of variables written so far.
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Byte order of the host this writer runs on.
    pub fn host_byte_order(&self) -> ByteOrder {
        self.host_order
    }

    /// Write a column-major double matrix.
    ///
    /// `data[c * rows + r]` is element `(r, c)`. An empty `data` slice
    /// writes an empty matrix.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if `data.len() != rows * cols`
    /// - [`Error::FileClosed`] if the writer is closed
    /// - [`Error::Io`] if writing fails
    pub fn write_matrix(
        &mut self,
        name: &str,
        rows: usize,
        cols: usize,
        data: &[f64],
    ) -> Result<()> {
        self.write_variable(name, |s| matrix::write_matrix(s, name, rows, cols, data))
    }

    /// Write a row-major double matrix.
    ///
    /// `data[r * cols + c]` is element `(r, c)`; values are transposed as
    /// they are written.
    ///
    /// # Errors
    ///
    /// Same as [`write_matrix`](Self::write_matrix).
    pub fn write_matrix_row_major(
        &mut self,
        name: &str,
        rows: usize,
        cols: usize,
        data: &[f64],
    ) -> Result<()> {
        self.write_variable(name, |s| {
            matrix::write_matrix_row_major(s, name, rows, cols, data)
        })
    }

    /// Write an empty 0x0 double matrix.
    pub fn write_empty(&mut self, name: &str) -> Result<()> {
        self.write_variable(name, |s| matrix::write_empty(s, name))
    }

    /// Write a 1xN character array.
    pub fn write_string(&mut self, name: &str, text: &str) -> Result<()> {
        self.write_variable(name, |s| matrix::write_string(s, name, text))
    }

    /// Write a 1xN character array from Latin-1 bytes.
    pub fn write_string_bytes(&mut self, name: &str, text: &[u8]) -> Result<()> {
        self.write_variable(name, |s| matrix::write_string_bytes(s, name, text))
    }

    /// Write the first `len` bytes of `text` as a 1x`len` character array.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLength`] if `len` exceeds `text.len()`.
    pub fn write_string_with_len(&mut self, name: &str, text: &[u8], len: usize) -> Result<()> {
        let text = text.get(..len).ok_or(Error::InvalidLength {
            len,
            available: text.len(),
        })?;
        self.write_string_bytes(name, text)
    }

    /// Write a 1xN cell array.
    pub fn write_cell_list(&mut self, name: &str, values: &[CellValue]) -> Result<()> {
        self.write_variable(name, |s| cell::write_cell_list(s, name, values))
    }

    /// Write a cell array with one column per list.
    ///
    /// See [`cell::write_cell_matrix`](crate::cell::write_cell_matrix) for
    /// the layout.
    pub fn write_cell_matrix<L: AsRef<[CellValue]>>(
        &mut self,
        name: &str,
        lists: &[L],
    ) -> Result<()> {
        self.write_variable(name, |s| cell::write_cell_matrix(s, name, lists))
    }

    /// Flush buffered output to the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.stream_mut()?.flush()?;
        Ok(())
    }

    /// Flush and release the sink.
    ///
    /// Closing an already closed writer does nothing.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };

        stream.flush()?;
        debug!(
            "closed MAT writer: {} variables, {} bytes",
            self.variable_count,
            stream.position()
        );
        Ok(())
    }

    /// Flush and hand back the sink.
    ///
    /// # Errors
    ///
    /// [`Error::FileClosed`] if the writer was already closed.
    pub fn into_inner(mut self) -> Result<W> {
        let mut stream = self.stream.take().ok_or(Error::FileClosed)?;
        stream.flush()?;
        Ok(stream.into_inner())
    }

    fn stream_mut(&mut self) -> Result<&mut TrackedWriter<W>> {
        if let Some(offset) = self.poisoned_at {
            return Err(Error::Poisoned { offset });
        }
        self.stream.as_mut().ok_or(Error::FileClosed)
    }

    fn write_variable<F>(&mut self, name: &str, write: F) -> Result<()>
    where
        F: FnOnce(&mut TrackedWriter<W>) -> Result<()>,
    {
        let stream = self.stream_mut()?;
        let start = stream.position();

        if let Err(err) = write(stream) {
            // Validation failures write nothing and leave the file intact
            if stream.position() != start {
                warn!(
                    "write of '{}' at offset {} failed part way: {}",
                    name, start, err
                );
                self.poisoned_at = Some(start);
            }
            return Err(err);
        }
        let end = stream.position();

        self.variable_count += 1;
        debug!(
            "wrote '{}': {} bytes at offset {}",
            name,
            end - start,
            start
        );
        Ok(())
    }
}

impl<W: Write> Drop for MatWriter<W> {
    fn drop(&mut self) {
        if self.stream.is_some() {
            // Best-effort close, ignore errors
            let _ = self.close();
        }
    }
}

impl<W: Write> std::fmt::Debug for MatWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatWriter")
            .field("path", &self.path)
            .field("position", &self.position())
            .field("variable_count", &self.variable_count)
            .field("poisoned_at", &self.poisoned_at)
            .finish()
    }
}

// ============================================================================
// ndarray Integration
// ============================================================================

#[cfg(feature = "ndarray")]
use ndarray::{ArrayBase, Data, Ix2};

#[cfg(feature = "ndarray")]
impl<W: Write> MatWriter<W> {
    /// Write a 2-D array or view as a double matrix.
    ///
    /// Standard (row-major) arrays go through the transposing writer,
    /// Fortran-ordered arrays are written straight from memory, and any
    /// other layout is copied into column-major order first.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use matwrite::MatWriter;
    /// use ndarray::array;
    ///
    /// let mut writer = MatWriter::create("grid.mat", None)?;
    /// let grid = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
    /// writer.write_array2("grid", &grid)?;
    /// writer.close()?;
    /// # Ok::<(), matwrite::Error>(())
    /// ```
    pub fn write_array2<S>(&mut self, name: &str, data: &ArrayBase<S, Ix2>) -> Result<()>
    where
        S: Data<Elem = f64>,
    {
        let (rows, cols) = data.dim();

        if let Some(row_major) = data.as_slice() {
            return self.write_matrix_row_major(name, rows, cols, row_major);
        }

        let transposed = data.t();
        if let Some(col_major) = transposed.as_slice() {
            return self.write_matrix(name, rows, cols, col_major);
        }

        let col_major: Vec<f64> = transposed.iter().copied().collect();
        self.write_matrix(name, rows, cols, &col_major)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::HEADER_LEN;
    use crate::matrix::{matrix_len, string_len};

    fn writer() -> MatWriter<Vec<u8>> {
        MatWriterBuilder::new().build(Vec::new()).unwrap()
    }

    #[test]
    fn test_positions_track_variables() {
        let mut w = writer();
        w.write_matrix("a", 1, 1, &[1.0]).unwrap();
        w.write_string("b", "xy").unwrap();

        let expected = HEADER_LEN + 8 + matrix_len(1, 1, 1) + 8 + string_len(1, 2);
        assert_eq!(w.position(), Some(expected as u64));
        assert_eq!(w.variable_count(), 2);
        assert_eq!(w.into_inner().unwrap().len(), expected);
    }

    #[test]
    fn test_close_twice() {
        let mut w = writer();
        assert!(w.is_ok());
        w.close().unwrap();
        assert!(!w.is_ok());
        w.close().unwrap();
        assert_eq!(w.position(), None);
    }

    #[test]
    fn test_write_after_close() {
        let mut w = writer();
        w.close().unwrap();
        let err = w.write_matrix("a", 1, 1, &[1.0]).unwrap_err();
        assert!(matches!(err, Error::FileClosed));
        assert!(matches!(w.flush(), Err(Error::FileClosed)));
    }

    #[test]
    fn test_failed_write_is_not_counted() {
        let mut w = writer();
        assert!(w.write_matrix("a", 2, 2, &[1.0]).is_err());
        assert_eq!(w.variable_count(), 0);
        assert_eq!(w.position(), Some(HEADER_LEN as u64));
    }

    #[test]
    fn test_string_with_len() {
        let mut a = writer();
        a.write_string_with_len("s", b"abcdef", 3).unwrap();
        let mut b = writer();
        b.write_string_bytes("s", b"abc").unwrap();
        assert_eq!(
            a.into_inner().unwrap()[HEADER_LEN..],
            b.into_inner().unwrap()[HEADER_LEN..]
        );

        let mut c = writer();
        let err = c.write_string_with_len("s", b"ab", 3).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { len: 3, .. }));
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn test_array2_layouts_agree() {
        use ndarray::{array, s, Array2, ShapeBuilder};

        let standard = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let fortran =
            Array2::from_shape_vec((2, 3).f(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]).unwrap();
        let wide = array![[1.0, 9.0, 2.0, 9.0, 3.0, 9.0], [4.0, 9.0, 5.0, 9.0, 6.0, 9.0]];
        let strided = wide.slice(s![.., ..;2]);
        assert_eq!(standard, fortran);
        assert_eq!(standard, strided);

        let mut a = writer();
        a.write_array2("m", &standard).unwrap();
        let mut b = writer();
        b.write_array2("m", &fortran).unwrap();
        let mut c = writer();
        c.write_array2("m", &strided).unwrap();

        let a = a.into_inner().unwrap();
        assert_eq!(a[HEADER_LEN..], b.into_inner().unwrap()[HEADER_LEN..]);
        assert_eq!(a[HEADER_LEN..], c.into_inner().unwrap()[HEADER_LEN..]);
    }
}
