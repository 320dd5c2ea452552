//! Command-line argument definitions using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

use crate::table::{is_identifier, sanitize_name};

/// Convert delimited text tables to MATLAB/Octave .mat files.
///
/// csv2mat reads one or more CSV (or other delimited) files and writes each
/// as a variable of a single Level-5 MAT-file: a double matrix by default,
/// or a cell array with one column per field when --cells is given.
#[derive(Parser, Debug)]
#[command(name = "csv2mat")]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Args {
    /// Input tables, each as PATH or NAME=PATH
    #[arg(value_name = "INPUT", required = true, value_parser = parse_input)]
    pub inputs: Vec<InputArg>,

    /// Output .mat file (omit for --dry-run)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    // ========================================================================
    // Table Parsing
    // ========================================================================
    /// Field delimiter: a single ASCII character, or \t for tab
    #[arg(short, long, value_name = "CHAR", default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Skip the first record of every input
    #[arg(long)]
    pub header: bool,

    /// Write tables as cell arrays instead of double matrices
    ///
    /// Numeric fields become scalars, empty fields become empty cells and
    /// anything else is kept as text. Without this flag every field must be
    /// numeric; empty fields are read as NaN.
    #[arg(long)]
    pub cells: bool,

    // ========================================================================
    // Extra Variables
    // ========================================================================
    /// Add a string variable (repeatable)
    #[arg(short = 's', long = "string", value_name = "NAME=TEXT", value_parser = parse_string_var)]
    pub strings: Vec<StringVar>,

    /// Text appended to the file header
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,

    // ========================================================================
    // Output Control
    // ========================================================================
    /// Show planned variables and sizes without writing output
    #[arg(long)]
    pub dry_run: bool,

    /// Show detailed progress and information
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Force overwrite of existing output file
    #[arg(long)]
    pub force: bool,
}

/// One input table and the variable name it will be written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputArg {
    /// Name given on the command line, if any.
    pub name: Option<String>,
    /// Path to the table.
    pub path: PathBuf,
}

impl InputArg {
    /// Variable name: the explicit name, or the sanitised file stem.
    pub fn variable_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => {
                let stem = self
                    .path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                sanitize_name(&stem)
            }
        }
    }
}

/// A string variable given with `--string NAME=TEXT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringVar {
    /// Variable name.
    pub name: String,
    /// Variable contents.
    pub text: String,
}

fn parse_input(s: &str) -> Result<InputArg, String> {
    if let Some((name, path)) = s.split_once('=') {
        if is_identifier(name) && !path.is_empty() {
            return Ok(InputArg {
                name: Some(name.to_string()),
                path: PathBuf::from(path),
            });
        }
    }

    if s.is_empty() {
        return Err("input path is empty".to_string());
    }

    Ok(InputArg {
        name: None,
        path: PathBuf::from(s),
    })
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!(
                "delimiter must be a single ASCII character, got '{}'",
                s
            )),
        },
    }
}

fn parse_string_var(s: &str) -> Result<StringVar, String> {
    let (name, text) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=TEXT, got '{}'", s))?;

    if !is_identifier(name) {
        return Err(format!("'{}' is not a valid variable name", name));
    }

    Ok(StringVar {
        name: name.to_string(),
        text: text.to_string(),
    })
}

impl Args {
    /// Validate argument combinations.
    pub fn validate(&self) -> Result<(), String> {
        // Conversion needs an output file
        if self.output.is_none() && !self.dry_run {
            return Err("Output file is required (use -o FILE, or --dry-run)".to_string());
        }

        // Check input files exist
        for input in &self.inputs {
            if !input.path.exists() {
                return Err(format!("Input file not found: {}", input.path.display()));
            }
        }

        // Check output doesn't exist (unless --force)
        if let Some(ref output) = self.output {
            if output.exists() && !self.force && !self.dry_run {
                return Err(format!(
                    "Output file already exists: {} (use --force to overwrite)",
                    output.display()
                ));
            }
        }

        // Quiet and verbose are mutually exclusive
        if self.quiet && self.verbose {
            return Err("Cannot use both --quiet and --verbose".to_string());
        }

        Ok(())
    }
}

/// Example usage shown in --help.
const EXAMPLES: &str = r#"
EXAMPLES:
    # Convert one table; the variable is named after the file (positions)
    csv2mat positions.csv -o tracking.mat

    # Several tables, with explicit variable names
    csv2mat xy=positions.csv t=times.csv -o tracking.mat

    # Tab-separated input with a header line
    csv2mat -d '\t' --header data.tsv -o data.mat

    # Mixed text and numbers as a cell array
    csv2mat --cells labels.csv -o labels.mat

    # Add string variables and a header description
    csv2mat data.csv -o data.mat -s sample="HeLa 07" --description "run 3"

    # Show what would be written
    csv2mat --dry-run data.csv
"#;
