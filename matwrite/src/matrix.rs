//! `miMATRIX` container assembly.
//!
//! Every variable in a MAT-file is one `miMATRIX` element whose payload is
//! a fixed sequence of sub-elements:
//!
//! ```text
//! miMATRIX tag (type 14, declared length)
//!   array flags   miUINT32 [class, 0]          16 bytes
//!   dimensions    miINT32  [rows, cols]        16 bytes
//!   name          miINT8   name bytes          8 + padded(name)
//!   data          miDOUBLE / miUINT16 / nested miMATRIX elements
//! ```
//!
//! Numeric matrices and strings have sizes that are known in closed form,
//! so their tag is written first. Containers whose payload size depends on
//! nested content go through [`write_deferred`], which encodes the payload
//! into memory and writes the tag once the length is known.

use std::io::Write;

use log::{trace, warn};

use crate::data_type::{ArrayClass, DataType};
use crate::element::{
    checked_count, element_len, length_field, padded_len_16bit, write_array, write_f64_array,
    write_f64_array_row_major, write_string_16bit, write_string_8bit, write_tag, write_utf16,
    TAG_LEN,
};
use crate::error::{Error, Result};
use crate::primitive::TrackedWriter;

/// On-disk size of the array-flags sub-element.
pub const FLAGS_LEN: usize = element_len(8);

/// On-disk size of the dimensions sub-element.
pub const DIMS_LEN: usize = element_len(8);

/// Declared length of a container holding a name of `name_len` bytes and a
/// data section occupying `data_len` bytes on disk.
pub const fn container_len(name_len: usize, data_len: usize) -> usize {
    FLAGS_LEN + DIMS_LEN + element_len(name_len) + data_len
}

/// Declared length of a `rows x cols` double matrix container.
pub const fn matrix_len(name_len: usize, rows: usize, cols: usize) -> usize {
    container_len(name_len, element_len(rows * cols * 8))
}

/// Declared length of a character container of `chars` characters.
pub const fn string_len(name_len: usize, chars: usize) -> usize {
    container_len(name_len, TAG_LEN + padded_len_16bit(chars))
}

/// Write a column-major double matrix.
///
/// `data[c * rows + r]` is element `(r, c)`. An empty `data` slice always
/// produces a valid empty matrix.
pub fn write_matrix<W: Write>(
    stream: &mut TrackedWriter<W>,
    name: &str,
    rows: usize,
    cols: usize,
    data: &[f64],
) -> Result<()> {
    let (rows, cols) = matrix_dims(name, rows, cols, data)?;
    trace!("matrix '{}' {}x{} (column-major)", name, rows, cols);

    write_fixed_container(
        stream,
        ArrayClass::Double,
        name,
        rows,
        cols,
        data.len() * 8,
        |s| write_f64_array(s, data),
    )
}

/// Write a row-major double matrix, transposing on the fly.
///
/// `data[r * cols + c]` is element `(r, c)`. Produces the same bytes as
/// [`write_matrix`] given the transposed buffer.
pub fn write_matrix_row_major<W: Write>(
    stream: &mut TrackedWriter<W>,
    name: &str,
    rows: usize,
    cols: usize,
    data: &[f64],
) -> Result<()> {
    let (rows, cols) = matrix_dims(name, rows, cols, data)?;
    trace!("matrix '{}' {}x{} (row-major)", name, rows, cols);

    write_fixed_container(
        stream,
        ArrayClass::Double,
        name,
        rows,
        cols,
        data.len() * 8,
        |s| write_f64_array_row_major(s, data, rows, cols),
    )
}

/// Write an empty 0x0 double matrix.
pub fn write_empty<W: Write>(stream: &mut TrackedWriter<W>, name: &str) -> Result<()> {
    write_matrix(stream, name, 0, 0, &[])
}

/// Write a 1xN character array from Rust text, encoded as UTF-16.
pub fn write_string<W: Write>(stream: &mut TrackedWriter<W>, name: &str, text: &str) -> Result<()> {
    let units: Vec<u16> = text.encode_utf16().collect();
    trace!("string '{}' ({} chars)", name, units.len());

    write_fixed_container(
        stream,
        ArrayClass::Char,
        name,
        1,
        units.len(),
        units.len() * 2,
        |s| write_utf16(s, &units),
    )
}

/// Write a 1xN character array from Latin-1 bytes.
///
/// Each byte becomes one character.
pub fn write_string_bytes<W: Write>(
    stream: &mut TrackedWriter<W>,
    name: &str,
    text: &[u8],
) -> Result<()> {
    trace!("string '{}' ({} bytes)", name, text.len());

    write_fixed_container(
        stream,
        ArrayClass::Char,
        name,
        1,
        text.len(),
        text.len() * 2,
        |s| write_string_16bit(s, text),
    )
}

/// Write a container whose payload is produced by `body` before its
/// length is known.
///
/// `body` writes into an in-memory stream positioned where the payload will
/// land, so nested position checks stay valid. The tag is then written
/// with the exact payload length, followed by the payload. On return the
/// stream sits at `start + 8 + declared_length`.
pub fn write_deferred<W, F>(
    stream: &mut TrackedWriter<W>,
    data_type: DataType,
    body: F,
) -> Result<()>
where
    W: Write,
    F: FnOnce(&mut TrackedWriter<Vec<u8>>) -> Result<()>,
{
    let start = stream.position();
    let mut nested = TrackedWriter::with_position(Vec::new(), start + TAG_LEN as u64);
    body(&mut nested)?;

    let payload = nested.into_inner();
    let declared = length_field("container", payload.len())?;
    trace!(
        "{} at offset {}: {} bytes buffered",
        data_type, start, declared
    );
    write_tag(stream, data_type, declared)?;
    stream.write_all(&payload)?;

    check_end(stream, start, declared)
}

/// Write the flags, dimensions and name sub-elements shared by every
/// container.
pub(crate) fn write_array_header<W: Write>(
    stream: &mut TrackedWriter<W>,
    class: ArrayClass,
    name: &str,
    rows: usize,
    cols: usize,
) -> Result<()> {
    write_array(stream, &class.flags())?;
    write_array(stream, &[dimension(rows)?, dimension(cols)?])?;
    write_string_8bit(stream, name.as_bytes())
}

fn write_fixed_container<W, F>(
    stream: &mut TrackedWriter<W>,
    class: ArrayClass,
    name: &str,
    rows: usize,
    cols: usize,
    data_payload_len: usize,
    write_data: F,
) -> Result<()>
where
    W: Write,
    F: FnOnce(&mut TrackedWriter<W>) -> Result<()>,
{
    dimension(rows)?;
    dimension(cols)?;
    let declared = length_field(
        "matrix",
        container_len(name.len(), element_len(data_payload_len)),
    )?;
    let start = stream.position();

    write_tag(stream, DataType::Matrix, declared)?;
    write_array_header(stream, class, name, rows, cols)?;
    write_data(stream)?;

    check_end(stream, start, declared)
}

fn matrix_dims(name: &str, rows: usize, cols: usize, data: &[f64]) -> Result<(usize, usize)> {
    if data.is_empty() {
        if rows != 0 && cols != 0 {
            warn!(
                "matrix '{}': no data for {}x{}, writing an empty 0x0 matrix",
                name, rows, cols
            );
            return Ok((0, 0));
        }
        return Ok((rows, cols));
    }
    checked_count(rows, cols, data.len())?;
    Ok((rows, cols))
}

fn dimension(n: usize) -> Result<i32> {
    i32::try_from(n).map_err(|_| Error::too_large("dimension", n))
}

fn check_end<W: Write>(stream: &TrackedWriter<W>, start: u64, declared: u32) -> Result<()> {
    let expected = start + TAG_LEN as u64 + u64::from(declared);
    let actual = stream.position();
    if actual != expected {
        return Err(Error::PositionMismatch { expected, actual });
    }
    Ok(())
}
