//! Host and file byte order.

use std::fmt;

/// Byte order of a machine or a MAT-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first.
    LittleEndian,
    /// Most significant byte first.
    BigEndian,
}

impl ByteOrder {
    /// Byte order of every number this crate writes.
    ///
    /// Files always declare `"IM"` in their header, so values are converted
    /// to little-endian on big-endian hosts.
    pub const FILE: ByteOrder = ByteOrder::LittleEndian;

    /// Byte order of the machine running this code.
    pub const fn host() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Endian indicator bytes as they appear at offset 126 of a file
    /// written in this byte order.
    pub const fn indicator(&self) -> [u8; 2] {
        match self {
            ByteOrder::LittleEndian => *b"IM",
            ByteOrder::BigEndian => *b"MI",
        }
    }

    /// Whether values must be byte-swapped on this host to land in
    /// [`ByteOrder::FILE`] order.
    pub const fn needs_swap(&self) -> bool {
        !matches!(self, ByteOrder::LittleEndian)
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::LittleEndian => write!(f, "little-endian"),
            ByteOrder::BigEndian => write!(f, "big-endian"),
        }
    }
}
