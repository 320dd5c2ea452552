//! # matwrite
//!
//! Write MATLAB Level-5 MAT-files (`.mat`) from Rust.
//!
//! A MAT-file is a 128-byte header followed by a sequence of tagged data
//! elements, one per variable. This crate writes double matrices, character
//! arrays, and cell arrays of heterogeneous values, streaming everything to
//! any [`std::io::Write`] sink. Output is always little-endian and can be
//! read back by MATLAB, Octave, SciPy, and the `matfile` crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use matwrite::{CellValue, MatWriter, Result};
//!
//! fn main() -> Result<()> {
//!     let mut writer = MatWriter::create("trace.mat", Some("bead tracking"))?;
//!
//!     // Column-major: element (r, c) at data[c * rows + r]
//!     writer.write_matrix("positions", 2, 2, &[0.0, 1.0, 10.0, 11.0])?;
//!
//!     writer.write_string("sample", "HeLa 07")?;
//!
//!     // One column per list; short lists are padded with empty cells
//!     writer.write_cell_matrix(
//!         "tracks",
//!         &[
//!             vec![CellValue::from("t1"), CellValue::from(0.25)],
//!             vec![CellValue::from("t2")],
//!         ],
//!     )?;
//!
//!     writer.close()
//! }
//! ```
//!
//! ### With ndarray (optional feature)
//!
//! ```no_run
//! # #[cfg(feature = "ndarray")]
//! # fn example() -> matwrite::Result<()> {
//! use matwrite::MatWriter;
//! use ndarray::Array2;
//!
//! let image = Array2::<f64>::zeros((480, 640));
//! let mut writer = MatWriter::create("frame.mat", None)?;
//! writer.write_array2("image", &image)?;
//! writer.close()
//! # }
//! ```
//!
//! ## Supported Variable Types
//!
//! | Method | MATLAB class | Shape |
//! |--------|--------------|-------|
//! | `write_matrix` / `write_matrix_row_major` | double | rows x cols |
//! | `write_empty` | double | 0 x 0 |
//! | `write_string` / `write_string_bytes` | char | 1 x N |
//! | `write_cell_list` | cell | 1 x N |
//! | `write_cell_matrix` | cell | longest list x list count |
//!
//! ## Lower-Level Encoding
//!
//! The [`element`], [`matrix`], and [`cell`] modules expose the encoders the
//! writer is built from. They operate on a [`TrackedWriter`] and can be used
//! to embed MAT data in a larger stream.
//!
//! ## Feature Flags
//!
//! - `ndarray`: Enable `write_array2` for `ndarray` 2-D arrays and views
//!
//! ## Thread Safety
//!
//! Writing takes `&mut self`, so a `MatWriter` is used from one place at a
//! time. Separate writers on separate files are independent.

#![deny(missing_docs)]

// Modules
mod builder;
mod byte_order;
pub mod cell;
mod data_type;
pub mod element;
mod error;
mod header;
pub mod matrix;
mod primitive;
mod writer;

// Public exports
pub use builder::MatWriterBuilder;
pub use byte_order::ByteOrder;
pub use cell::CellValue;
pub use data_type::{ArrayClass, DataType};
pub use error::{Error, Result};
pub use header::{Header, DESCRIPTION_LEN, HEADER_LEN, VERSION};
pub use primitive::{write_primitive, Primitive, TrackedWriter};
pub use writer::MatWriter;

// Conditional re-exports
#[cfg(feature = "ndarray")]
pub use ndarray;
