//! Reading delimited text tables into MAT variable contents.

use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use log::debug;
use matwrite::CellValue;

/// Longest variable name MATLAB accepts.
pub const MAX_NAME_LEN: usize = 63;

/// A table read from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum Table {
    /// Rectangular numeric data, row-major.
    Numeric {
        /// Number of records.
        rows: usize,
        /// Fields per record.
        cols: usize,
        /// `data[r * cols + c]` is field `c` of record `r`.
        data: Vec<f64>,
    },
    /// One list of cells per column.
    Cells(Vec<Vec<CellValue>>),
}

/// Options for reading a table.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Whether the first record is a header to skip.
    pub has_header: bool,
    /// Read as cells rather than numbers.
    pub cells: bool,
}

/// Read a table from `path`.
pub fn read_table(path: &Path, options: ReadOptions) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open table: {}", path.display()))?;

    let mut records = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| {
            format!("Failed to read record {} of {}", index + 1, path.display())
        })?;
        records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    debug!("read {} records from {}", records.len(), path.display());

    if options.cells {
        Ok(cells_table(&records))
    } else {
        numeric_table(&records).with_context(|| format!("In {}", path.display()))
    }
}

fn numeric_table(records: &[Vec<String>]) -> Result<Table> {
    let rows = records.len();
    let cols = records.first().map_or(0, Vec::len);
    let mut data = Vec::with_capacity(rows * cols);

    for (r, record) in records.iter().enumerate() {
        if record.len() != cols {
            bail!(
                "record {} has {} fields, expected {} (use --cells for ragged tables)",
                r + 1,
                record.len(),
                cols
            );
        }

        for (c, field) in record.iter().enumerate() {
            let value = parse_number(field).with_context(|| {
                format!(
                    "field {} of record {} is not a number: '{}' (use --cells for text)",
                    c + 1,
                    r + 1,
                    field
                )
            })?;
            data.push(value);
        }
    }

    Ok(Table::Numeric { rows, cols, data })
}

fn cells_table(records: &[Vec<String>]) -> Table {
    let cols = records.iter().map(Vec::len).max().unwrap_or(0);
    let mut columns = vec![Vec::with_capacity(records.len()); cols];

    for record in records {
        for (c, column) in columns.iter_mut().enumerate() {
            column.push(match record.get(c) {
                Some(field) => cell_value(field),
                None => CellValue::Empty,
            });
        }
    }

    Table::Cells(columns)
}

/// Parse a numeric field; an empty field reads as NaN.
fn parse_number(field: &str) -> Result<f64> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(f64::NAN);
    }
    Ok(field.parse::<f64>()?)
}

/// Classify one field for a cell table.
fn cell_value(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(value) => CellValue::Scalar(value),
        Err(_) => CellValue::Text(field.to_string()),
    }
}

/// Whether `name` is a valid MATLAB variable name.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    name.len() <= MAX_NAME_LEN && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Turn arbitrary text (usually a file stem) into a MATLAB variable name.
///
/// Invalid characters become `_`, a leading non-letter gets an `x` prefix
/// and the result is cut to [`MAX_NAME_LEN`] characters.
pub fn sanitize_name(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if name.is_empty() {
        return "data".to_string();
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        name.insert(0, 'x');
    }
    name.truncate(MAX_NAME_LEN);
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn options(cells: bool) -> ReadOptions {
        ReadOptions {
            delimiter: b',',
            has_header: false,
            cells,
        }
    }

    #[test]
    fn test_numeric_table() {
        let file = table_file("1,2,3\n4,5,6\n");
        let table = read_table(file.path(), options(false)).unwrap();
        assert_eq!(
            table,
            Table::Numeric {
                rows: 2,
                cols: 3,
                data: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            }
        );
    }

    #[test]
    fn test_numeric_empty_field_is_nan() {
        let file = table_file("1, ,3\n");
        match read_table(file.path(), options(false)).unwrap() {
            Table::Numeric { data, .. } => {
                assert_eq!(data[0], 1.0);
                assert!(data[1].is_nan());
                assert_eq!(data[2], 3.0);
            }
            other => panic!("unexpected table {:?}", other),
        }
    }

    #[test]
    fn test_numeric_rejects_text() {
        let file = table_file("1,two\n");
        let err = read_table(file.path(), options(false)).unwrap_err();
        assert!(format!("{:#}", err).contains("field 2 of record 1"));
    }

    #[test]
    fn test_numeric_rejects_ragged() {
        let file = table_file("1,2\n3\n");
        let err = read_table(file.path(), options(false)).unwrap_err();
        assert!(format!("{:#}", err).contains("record 2 has 1 fields"));
    }

    #[test]
    fn test_header_skipped() {
        let file = table_file("x;y\n1;2\n");
        let table = read_table(
            file.path(),
            ReadOptions {
                delimiter: b';',
                has_header: true,
                cells: false,
            },
        )
        .unwrap();
        assert_eq!(
            table,
            Table::Numeric {
                rows: 1,
                cols: 2,
                data: vec![1.0, 2.0],
            }
        );
    }

    #[test]
    fn test_cells_table() {
        let file = table_file("t1,0.5,\nt2\n");
        let table = read_table(file.path(), options(true)).unwrap();
        assert_eq!(
            table,
            Table::Cells(vec![
                vec![CellValue::from("t1"), CellValue::from("t2")],
                vec![CellValue::from(0.5), CellValue::Empty],
                vec![CellValue::Empty, CellValue::Empty],
            ])
        );
    }

    #[test]
    fn test_empty_file() {
        let file = table_file("");
        assert_eq!(
            read_table(file.path(), options(false)).unwrap(),
            Table::Numeric {
                rows: 0,
                cols: 0,
                data: vec![],
            }
        );
        assert_eq!(
            read_table(file.path(), options(true)).unwrap(),
            Table::Cells(vec![])
        );
    }

    #[test]
    fn test_identifier() {
        assert!(is_identifier("x"));
        assert!(is_identifier("track_01"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("_x"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(&"a".repeat(64)));
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("positions"), "positions");
        assert_eq!(sanitize_name("run-3 final"), "run_3_final");
        assert_eq!(sanitize_name("2024"), "x2024");
        assert_eq!(sanitize_name("_tmp"), "x_tmp");
        assert_eq!(sanitize_name(""), "data");
        assert_eq!(sanitize_name(&"y".repeat(100)).len(), MAX_NAME_LEN);
        assert!(is_identifier(&sanitize_name("é-ü")));
    }
}
