//! The 128-byte MAT-file header.
//!
//! ```text
//! offset  size  field
//!      0   116  descriptive text, space padded
//!    116     8  subsystem data offset (zero)
//!    124     2  version (0x0100)
//!    126     2  endian indicator ("IM")
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::byte_order::ByteOrder;
use crate::error::Result;
use crate::primitive::TrackedWriter;

/// Total header length.
pub const HEADER_LEN: usize = 128;

/// Length of the descriptive text field.
pub const DESCRIPTION_LEN: usize = 116;

/// Format version stored in the header.
pub const VERSION: u16 = 0x0100;

/// Descriptive text every file starts with.
const TEXT_PREFIX: &str = "MATLAB 5.0 MAT-file, written by matwrite";

/// Header written once at the start of every file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    description: Option<String>,
    created: DateTime<Utc>,
}

impl Header {
    /// A header stamped with the current time and no description.
    pub fn new() -> Self {
        Header {
            description: None,
            created: Utc::now(),
        }
    }

    /// Append a caller-supplied description to the header text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Override the creation timestamp.
    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    /// The caller-supplied description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The creation timestamp.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Full descriptive text before truncation to the field width.
    pub fn text(&self) -> String {
        let mut text = format!(
            "{}, {}",
            TEXT_PREFIX,
            self.created.format("%Y-%m-%d %H:%M:%S UTC")
        );
        if let Some(description) = &self.description {
            text.push_str(": ");
            text.push_str(description);
        }
        text
    }

    /// The 116-byte description field: the text truncated or padded with
    /// spaces.
    pub fn description_field(&self) -> [u8; DESCRIPTION_LEN] {
        let mut field = [b' '; DESCRIPTION_LEN];
        let text = self.text();
        let len = text.len().min(DESCRIPTION_LEN);
        field[..len].copy_from_slice(&text.as_bytes()[..len]);
        field
    }

    /// Write the header.
    pub fn write_to<W: Write>(&self, stream: &mut TrackedWriter<W>) -> Result<()> {
        stream.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// The encoded header.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..DESCRIPTION_LEN].copy_from_slice(&self.description_field());
        // bytes 116..124: subsystem data offset, left zero
        bytes[124..126].copy_from_slice(&VERSION.to_le_bytes());
        bytes[126..128].copy_from_slice(&ByteOrder::FILE.indicator());
        bytes
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}
