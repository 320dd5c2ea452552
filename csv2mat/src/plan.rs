//! The set of variables a run will write.

use std::collections::HashSet;
use std::io::Write;

use anyhow::{bail, Result};
use matwrite::element::TAG_LEN;
use matwrite::matrix::{container_len, matrix_len, string_len};
use matwrite::{CellValue, MatWriter, HEADER_LEN};

use crate::cli::Args;
use crate::table::{read_table, ReadOptions, Table};

/// What a variable holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// A table read from a file.
    Table(Table),
    /// A string given on the command line.
    Text(String),
}

/// One variable to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// MATLAB variable name.
    pub name: String,
    /// Where the content came from, for display.
    pub source: String,
    /// The content.
    pub content: Content,
}

impl Variable {
    /// MATLAB class of the written variable.
    pub fn class(&self) -> &'static str {
        match &self.content {
            Content::Table(Table::Numeric { .. }) => "double",
            Content::Table(Table::Cells(_)) => "cell",
            Content::Text(_) => "char",
        }
    }

    /// Dimensions as MATLAB will report them.
    pub fn dims(&self) -> (usize, usize) {
        match &self.content {
            Content::Table(Table::Numeric { rows, cols, .. }) => (*rows, *cols),
            Content::Table(Table::Cells(columns)) => (
                columns.iter().map(Vec::len).max().unwrap_or(0),
                columns.len(),
            ),
            Content::Text(text) => (1, text.encode_utf16().count()),
        }
    }

    /// Bytes the variable occupies in the file, tag included.
    pub fn encoded_len(&self) -> usize {
        let name_len = self.name.len();
        TAG_LEN
            + match &self.content {
                Content::Table(Table::Numeric { rows, cols, .. }) => {
                    matrix_len(name_len, *rows, *cols)
                }
                Content::Table(Table::Cells(columns)) => {
                    let (rows, cols) = self.dims();
                    let present: usize = columns.iter().flatten().map(CellValue::encoded_len).sum();
                    let filled: usize = columns.iter().map(Vec::len).sum();
                    let padding = (rows * cols - filled) * CellValue::Empty.encoded_len();
                    container_len(name_len, present + padding)
                }
                Content::Text(text) => string_len(name_len, text.encode_utf16().count()),
            }
    }

    /// Append the variable to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut MatWriter<W>) -> matwrite::Result<()> {
        match &self.content {
            Content::Table(Table::Numeric { rows, cols, data }) => {
                writer.write_matrix_row_major(&self.name, *rows, *cols, data)
            }
            Content::Table(Table::Cells(columns)) => writer.write_cell_matrix(&self.name, columns),
            Content::Text(text) => writer.write_string(&self.name, text),
        }
    }
}

/// Read every input and collect the variables in command-line order:
/// tables first, then `--string` variables.
pub fn build(args: &Args) -> Result<Vec<Variable>> {
    let options = ReadOptions {
        delimiter: args.delimiter,
        has_header: args.header,
        cells: args.cells,
    };

    let mut variables = Vec::with_capacity(args.inputs.len() + args.strings.len());

    for input in &args.inputs {
        variables.push(Variable {
            name: input.variable_name(),
            source: input.path.display().to_string(),
            content: Content::Table(read_table(&input.path, options)?),
        });
    }

    for var in &args.strings {
        variables.push(Variable {
            name: var.name.clone(),
            source: "--string".to_string(),
            content: Content::Text(var.text.clone()),
        });
    }

    check_unique(&variables)?;
    Ok(variables)
}

/// Total file size for `variables`, header included.
pub fn file_len(variables: &[Variable]) -> u64 {
    (HEADER_LEN + variables.iter().map(Variable::encoded_len).sum::<usize>()) as u64
}

fn check_unique(variables: &[Variable]) -> Result<()> {
    let mut seen = HashSet::new();
    for var in variables {
        if !seen.insert(var.name.as_str()) {
            bail!(
                "Variable name '{}' is used more than once (name inputs with NAME=PATH)",
                var.name
            );
        }
    }
    Ok(())
}
