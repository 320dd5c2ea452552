//! Data element encoding.
//!
//! A data element is an 8-byte tag (`u32` type code, `u32` byte length)
//! followed by the payload and zero padding up to the next 8-byte boundary.
//! The declared byte length never includes the padding.
//!
//! ```text
//! +-----------+-------------+----------------------+-----------+
//! | type: u32 | length: u32 | payload (length)     | padding   |
//! +-----------+-------------+----------------------+-----------+
//!   4 bytes     4 bytes       length bytes           0..=7 bytes
//! ```
//!
//! The padded-length calculators in this module are the single source of
//! truth for element sizes; the container assembler uses them to compute
//! `miMATRIX` lengths before writing.

use std::io::Write;

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::primitive::{write_primitive, Primitive, TrackedWriter};

/// Size of a data element tag.
pub const TAG_LEN: usize = 8;

/// Every element footprint is a multiple of this many bytes.
pub const ALIGNMENT: usize = 8;

/// Number of zero bytes that follow a payload of `payload_len` bytes.
pub const fn padding_for(payload_len: usize) -> usize {
    (ALIGNMENT - payload_len % ALIGNMENT) % ALIGNMENT
}

/// Payload plus padding, in bytes.
pub const fn padded_len(payload_len: usize) -> usize {
    payload_len + padding_for(payload_len)
}

/// Total on-disk footprint of an element: tag, payload and padding.
pub const fn element_len(payload_len: usize) -> usize {
    TAG_LEN + padded_len(payload_len)
}

/// Payload plus padding of an 8-bit string element of `len` characters.
pub const fn padded_len_8bit(len: usize) -> usize {
    padded_len(len)
}

/// Payload plus padding of a 16-bit string element of `len` characters.
pub const fn padded_len_16bit(len: usize) -> usize {
    padded_len(len * 2)
}

/// Convert a payload size to the tag's 32-bit length field.
pub(crate) fn length_field(what: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::too_large(what, len))
}

/// Validate that `rows * cols` elements were supplied.
pub(crate) fn checked_count(rows: usize, cols: usize, len: usize) -> Result<usize> {
    match rows.checked_mul(cols) {
        Some(count) if count == len => Ok(count),
        Some(_) => Err(Error::invalid_dimensions(rows, cols, len)),
        None => Err(Error::too_large("matrix", usize::MAX)),
    }
}

/// Write an element tag.
pub fn write_tag<W: Write>(
    stream: &mut TrackedWriter<W>,
    data_type: DataType,
    byte_len: u32,
) -> Result<()> {
    write_primitive(stream, data_type.code())?;
    write_primitive(stream, byte_len)
}

/// Write the zero padding that follows a payload of `payload_len` bytes.
pub fn write_padding<W: Write>(stream: &mut TrackedWriter<W>, payload_len: usize) -> Result<()> {
    const ZEROS: [u8; ALIGNMENT] = [0; ALIGNMENT];

    let pad = padding_for(payload_len);
    if pad > 0 {
        stream.write_all(&ZEROS[..pad])?;
    }
    Ok(())
}

/// Write a single value as a one-element array.
///
/// Values narrower than 8 bytes are padded, so an `i16` scalar occupies
/// 16 bytes on disk while declaring a length of 2.
pub fn write_scalar<W: Write, T: Primitive>(stream: &mut TrackedWriter<W>, value: T) -> Result<()> {
    write_tag(stream, T::DATA_TYPE, T::WIDTH as u32)?;
    write_primitive(stream, value)?;
    write_padding(stream, T::WIDTH)
}

/// Write a slice of values as one array element.
pub fn write_array<W: Write, T: Primitive>(
    stream: &mut TrackedWriter<W>,
    values: &[T],
) -> Result<()> {
    let payload_len = values
        .len()
        .checked_mul(T::WIDTH)
        .ok_or(Error::too_large("element payload", values.len()))?;
    let byte_len = length_field("element payload", payload_len)?;

    write_tag(stream, T::DATA_TYPE, byte_len)?;
    for &value in values {
        write_primitive(stream, value)?;
    }
    write_padding(stream, payload_len)
}

/// Write a double array element, then verify the stream ended up where
/// the element's framing says it should.
pub fn write_f64_array<W: Write>(stream: &mut TrackedWriter<W>, values: &[f64]) -> Result<()> {
    let start = stream.position();
    write_array(stream, values)?;
    check_position(stream, start + element_len(values.len() * 8) as u64)
}

/// Write row-major data as a column-major double array element.
///
/// `data[r * cols + c]` is element `(r, c)`. Values are emitted column by
/// column straight from the caller's buffer; nothing is copied.
pub fn write_f64_array_row_major<W: Write>(
    stream: &mut TrackedWriter<W>,
    data: &[f64],
    rows: usize,
    cols: usize,
) -> Result<()> {
    let count = checked_count(rows, cols, data.len())?;
    let byte_len = length_field("element payload", count * 8)?;
    let start = stream.position();

    write_tag(stream, DataType::Double, byte_len)?;
    for c in 0..cols {
        for r in 0..rows {
            write_primitive(stream, data[r * cols + c])?;
        }
    }

    check_position(stream, start + element_len(count * 8) as u64)
}

/// Write bytes as an 8-bit (`miINT8`) string element.
///
/// One byte per character; the bytes are written unchanged.
pub fn write_string_8bit<W: Write>(stream: &mut TrackedWriter<W>, text: &[u8]) -> Result<()> {
    let byte_len = length_field("string", text.len())?;

    write_tag(stream, DataType::Int8, byte_len)?;
    stream.write_all(text)?;
    write_padding(stream, text.len())
}

/// Write bytes as a 16-bit (`miUINT16`) character element.
///
/// Each byte is zero-extended to one 16-bit unit, which is exact for
/// Latin-1 text. Use [`write_utf16`] for text that is already UTF-16.
pub fn write_string_16bit<W: Write>(stream: &mut TrackedWriter<W>, text: &[u8]) -> Result<()> {
    let payload_len = text
        .len()
        .checked_mul(2)
        .ok_or(Error::too_large("string", text.len()))?;
    let byte_len = length_field("string", payload_len)?;

    write_tag(stream, DataType::UInt16, byte_len)?;
    for &byte in text {
        write_primitive(stream, u16::from(byte))?;
    }
    write_padding(stream, payload_len)
}

/// Write UTF-16 code units as a 16-bit character element.
pub fn write_utf16<W: Write>(stream: &mut TrackedWriter<W>, units: &[u16]) -> Result<()> {
    write_array(stream, units)
}

fn check_position<W: Write>(stream: &TrackedWriter<W>, expected: u64) -> Result<()> {
    let actual = stream.position();
    if actual != expected {
        return Err(Error::PositionMismatch { expected, actual });
    }
    Ok(())
}
