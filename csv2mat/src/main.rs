//! csv2mat - Convert delimited text tables to MATLAB/Octave .mat files.
//!
//! Each input table becomes one variable of a Level-5 MAT-file, written
//! either as a double matrix or as a cell array.

mod cli;
mod commands;
mod output;
mod plan;
mod table;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use cli::Args;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    // Run the appropriate command
    if let Err(e) = run(args) {
        output::print_error(&e);
        std::process::exit(1);
    }
}

/// Main dispatch function.
fn run(args: Args) -> Result<()> {
    // Validate arguments
    args.validate().map_err(|e| anyhow::anyhow!("{}", e))?;

    // Dispatch to appropriate command
    if args.dry_run {
        commands::validate::run(&args)
    } else {
        commands::convert::run(&args)
    }
}
