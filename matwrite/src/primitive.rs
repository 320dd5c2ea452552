//! Fixed-width primitive writes and the position-tracking output stream.
//!
//! [`TrackedWriter`] wraps any [`Write`] sink and counts the bytes that
//! pass through it, giving the element encoder the equivalent of `ftell`
//! without requiring a seekable sink. [`write_primitive`] appends one
//! fixed-width value in file byte order.

use std::io::{self, Write};

use crate::data_type::DataType;
use crate::error::Result;

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width numeric value that can be stored in a data element.
///
/// Implemented for `u8`, `i8`, `u16`, `i16`, `u32`, `i32`, `u64`, `i64`,
/// `f32` and `f64`. The trait is sealed.
pub trait Primitive: Copy + sealed::Sealed {
    /// Width of the value on disk, in bytes.
    const WIDTH: usize;

    /// MAT data type used when this value is written as an element.
    const DATA_TYPE: DataType;

    /// Write the value in file byte order (little-endian).
    fn write_le<W: Write + ?Sized>(self, writer: &mut W) -> io::Result<()>;
}

macro_rules! impl_primitive {
    ($($ty:ty => $data_type:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Primitive for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                const DATA_TYPE: DataType = DataType::$data_type;

                #[inline]
                fn write_le<W: Write + ?Sized>(self, writer: &mut W) -> io::Result<()> {
                    writer.write_all(&self.to_le_bytes())
                }
            }
        )*
    };
}

impl_primitive! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    f32 => Single,
    f64 => Double,
    i64 => Int64,
    u64 => UInt64,
}

/// Append one primitive value to the stream.
///
/// Advances the stream position by exactly `T::WIDTH` bytes.
#[inline]
pub fn write_primitive<W: Write, T: Primitive>(
    stream: &mut TrackedWriter<W>,
    value: T,
) -> Result<()> {
    value.write_le(stream)?;
    Ok(())
}

/// Output stream that tracks its write position.
///
/// The position starts at zero (or at the offset given to
/// [`with_position`](Self::with_position)) and grows by the number of bytes
/// accepted by the inner sink.
#[derive(Debug)]
pub struct TrackedWriter<W> {
    inner: W,
    position: u64,
}

impl<W: Write> TrackedWriter<W> {
    /// Wrap a sink, starting at position zero.
    pub fn new(inner: W) -> Self {
        Self::with_position(inner, 0)
    }

    /// Wrap a sink whose logical position is already `position`.
    pub fn with_position(inner: W, position: u64) -> Self {
        TrackedWriter { inner, position }
    }

    /// Current write position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Borrow the inner sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the inner sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for TrackedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.position += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written<T: Primitive>(value: T) -> Vec<u8> {
        let mut stream = TrackedWriter::new(Vec::new());
        write_primitive(&mut stream, value).unwrap();
        assert_eq!(stream.position(), T::WIDTH as u64);
        stream.into_inner()
    }

    #[test]
    fn test_widths_and_bytes() {
        assert_eq!(written(0x12u8), vec![0x12]);
        assert_eq!(written(-1i8), vec![0xFF]);
        assert_eq!(written(0x0100u16), vec![0x00, 0x01]);
        assert_eq!(written(-2i16), vec![0xFE, 0xFF]);
        assert_eq!(written(14u32), vec![14, 0, 0, 0]);
        assert_eq!(written(-1i32), vec![0xFF; 4]);
        assert_eq!(written(1u64), vec![1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(written(-1i64), vec![0xFF; 8]);
        assert_eq!(written(1.0f32), 1.0f32.to_le_bytes().to_vec());
        assert_eq!(written(0.1f64), 0.1f64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_data_types() {
        assert_eq!(<f64 as Primitive>::DATA_TYPE, DataType::Double);
        assert_eq!(<u32 as Primitive>::DATA_TYPE, DataType::UInt32);
        assert_eq!(<i8 as Primitive>::DATA_TYPE, DataType::Int8);
        assert_eq!(<f32 as Primitive>::WIDTH, 4);
    }

    #[test]
    fn test_position_accumulates() {
        let mut stream = TrackedWriter::with_position(Vec::new(), 128);
        write_primitive(&mut stream, 1u32).unwrap();
        write_primitive(&mut stream, 2.5f64).unwrap();
        write_primitive(&mut stream, 3u16).unwrap();
        assert_eq!(stream.position(), 128 + 4 + 8 + 2);
        assert_eq!(stream.get_ref().len(), 14);
    }
}
