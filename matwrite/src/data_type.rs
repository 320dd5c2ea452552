//! MAT-file data type codes and array classes.
//!
//! Every data element starts with a tag naming one of the [`DataType`]
//! codes. Every `miMATRIX` element carries an [`ArrayClass`] in its
//! array-flags sub-element.

use std::fmt;

/// MAT Level-5 data element types.
///
/// Only the numeric types, `Matrix` and `Utf16`-style character payloads
/// are ever written; the remaining codes exist so the table is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DataType {
    /// 8-bit signed integer (`miINT8`)
    Int8 = 1,

    /// 8-bit unsigned integer (`miUINT8`)
    UInt8 = 2,

    /// 16-bit signed integer (`miINT16`)
    Int16 = 3,

    /// 16-bit unsigned integer (`miUINT16`)
    UInt16 = 4,

    /// 32-bit signed integer (`miINT32`)
    Int32 = 5,

    /// 32-bit unsigned integer (`miUINT32`)
    UInt32 = 6,

    /// 32-bit IEEE754 float (`miSINGLE`)
    Single = 7,

    /// 64-bit IEEE754 float (`miDOUBLE`)
    Double = 9,

    /// 64-bit signed integer (`miINT64`)
    Int64 = 12,

    /// 64-bit unsigned integer (`miUINT64`)
    UInt64 = 13,

    /// Nested array container (`miMATRIX`)
    Matrix = 14,

    /// zlib-compressed element (`miCOMPRESSED`), never written
    Compressed = 15,

    /// UTF-8 text (`miUTF8`), never written
    Utf8 = 16,

    /// UTF-16 text (`miUTF16`)
    Utf16 = 17,

    /// UTF-32 text (`miUTF32`), never written
    Utf32 = 18,
}

impl DataType {
    /// The raw tag value written to disk.
    pub const fn code(&self) -> u32 {
        *self as u32
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int8 => "miINT8",
            DataType::UInt8 => "miUINT8",
            DataType::Int16 => "miINT16",
            DataType::UInt16 => "miUINT16",
            DataType::Int32 => "miINT32",
            DataType::UInt32 => "miUINT32",
            DataType::Single => "miSINGLE",
            DataType::Double => "miDOUBLE",
            DataType::Int64 => "miINT64",
            DataType::UInt64 => "miUINT64",
            DataType::Matrix => "miMATRIX",
            DataType::Compressed => "miCOMPRESSED",
            DataType::Utf8 => "miUTF8",
            DataType::Utf16 => "miUTF16",
            DataType::Utf32 => "miUTF32",
        };
        f.write_str(name)
    }
}

/// Array classes stored in the array-flags sub-element of a `miMATRIX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ArrayClass {
    /// Cell array (`mxCELL_CLASS`)
    Cell = 0x01,

    /// Character array (`mxCHAR_CLASS`)
    Char = 0x04,

    /// Double-precision array (`mxDOUBLE_CLASS`)
    Double = 0x06,
}

impl ArrayClass {
    /// The class code stored in the low byte of the first flags word.
    pub const fn code(&self) -> u32 {
        *self as u32
    }

    /// The two-word payload of the array-flags sub-element.
    pub const fn flags(&self) -> [u32; 2] {
        [self.code(), 0]
    }
}

impl fmt::Display for ArrayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayClass::Cell => write!(f, "cell"),
            ArrayClass::Char => write!(f, "char"),
            ArrayClass::Double => write!(f, "double"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(DataType::Int8.code(), 1);
        assert_eq!(DataType::UInt16.code(), 4);
        assert_eq!(DataType::Int32.code(), 5);
        assert_eq!(DataType::UInt32.code(), 6);
        assert_eq!(DataType::Double.code(), 9);
        assert_eq!(DataType::Matrix.code(), 14);
        assert_eq!(DataType::Utf32.code(), 18);
    }

    #[test]
    fn test_array_class() {
        assert_eq!(ArrayClass::Double.flags(), [0x06, 0]);
        assert_eq!(ArrayClass::Char.code(), 0x04);
        assert_eq!(ArrayClass::Cell.code(), 0x01);
        assert_eq!(format!("{}", ArrayClass::Double), "double");
        assert_eq!(format!("{}", DataType::Matrix), "miMATRIX");
    }
}
