//! Cell arrays of heterogeneous values.
//!
//! [`CellValue`] is the closed set of things a cell can hold. Each cell is
//! written as a nested, unnamed `miMATRIX`:
//!
//! | Variant | Written as |
//! |---------|------------|
//! | `Text` | 1xN char array |
//! | `Scalar` | 1x1 double |
//! | `Pair` | 1x2 double (points, sizes) |
//! | `Empty` | 0x0 double |
//!
//! The size of a cell array depends on the runtime values of its cells, so
//! the container is assembled with [`write_deferred`].

use std::io::Write;

use log::trace;

use crate::data_type::{ArrayClass, DataType};
use crate::element::TAG_LEN;
use crate::error::Result;
use crate::matrix::{
    matrix_len, string_len, write_array_header, write_deferred, write_empty, write_matrix,
    write_string,
};
use crate::primitive::TrackedWriter;

/// Filler for slots past the end of a short list.
static EMPTY_CELL: CellValue = CellValue::Empty;

/// A value stored in one cell of a cell array.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Character data.
    Text(String),
    /// A real number.
    Scalar(f64),
    /// Two real numbers, such as a point or a size.
    Pair(f64, f64),
    /// Nothing; written as an empty matrix.
    #[default]
    Empty,
}

impl CellValue {
    /// Short name of the variant, for diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "text",
            CellValue::Scalar(_) => "scalar",
            CellValue::Pair(..) => "pair",
            CellValue::Empty => "empty",
        }
    }

    /// Bytes this cell occupies on disk, including its `miMATRIX` tag.
    pub fn encoded_len(&self) -> usize {
        TAG_LEN
            + match self {
                CellValue::Text(text) => string_len(0, text.encode_utf16().count()),
                CellValue::Scalar(_) => matrix_len(0, 1, 1),
                CellValue::Pair(..) => matrix_len(0, 1, 2),
                CellValue::Empty => matrix_len(0, 0, 0),
            }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Scalar(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Scalar(f64::from(value))
    }
}

impl From<(f64, f64)> for CellValue {
    fn from((a, b): (f64, f64)) -> Self {
        CellValue::Pair(a, b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

/// Write one cell as an unnamed nested matrix.
pub fn write_cell_value<W: Write>(stream: &mut TrackedWriter<W>, value: &CellValue) -> Result<()> {
    match value {
        CellValue::Text(text) => write_string(stream, "", text),
        CellValue::Scalar(v) => write_matrix(stream, "", 1, 1, &[*v]),
        CellValue::Pair(a, b) => write_matrix(stream, "", 1, 2, &[*a, *b]),
        CellValue::Empty => write_empty(stream, ""),
    }
}

/// Write a 1xN cell array.
pub fn write_cell_list<W: Write>(
    stream: &mut TrackedWriter<W>,
    name: &str,
    values: &[CellValue],
) -> Result<()> {
    write_cell_array(stream, name, 1, values.len(), values.iter())
}

/// Write a cell array from a list of lists.
///
/// The array has as many rows as the longest list and one column per list.
/// Slots past the end of a short list are written as empty cells, so the
/// container always holds exactly `rows * cols` nested elements. Cells are
/// emitted row by row: for each position within the lists, one cell from
/// every list in order.
pub fn write_cell_matrix<W, L>(stream: &mut TrackedWriter<W>, name: &str, lists: &[L]) -> Result<()>
where
    W: Write,
    L: AsRef<[CellValue]>,
{
    let rows = lists.iter().map(|list| list.as_ref().len()).max().unwrap_or(0);
    let cols = lists.len();

    let cells = (0..rows).flat_map(move |row| {
        lists
            .iter()
            .map(move |list| list.as_ref().get(row).unwrap_or(&EMPTY_CELL))
    });

    write_cell_array(stream, name, rows, cols, cells)
}

fn write_cell_array<'a, W, I>(
    stream: &mut TrackedWriter<W>,
    name: &str,
    rows: usize,
    cols: usize,
    cells: I,
) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a CellValue>,
{
    trace!("cell array '{}' {}x{}", name, rows, cols);

    write_deferred(stream, DataType::Matrix, |body| {
        write_array_header(body, ArrayClass::Cell, name, rows, cols)?;

        let mut count = 0usize;
        for cell in cells {
            write_cell_value(body, cell)?;
            count += 1;
        }
        debug_assert_eq!(count, rows * cols);

        Ok(())
    })
}
