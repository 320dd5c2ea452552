//! Dry-run validation command.

use anyhow::Result;
use colored::Colorize;

use crate::cli::Args;
use crate::output;
use crate::plan;

/// Run the validate (dry-run) command.
pub fn run(args: &Args) -> Result<()> {
    output::print_info(
        &format!("{} (no files will be written)", "Dry run mode".yellow()),
        args.quiet,
    );

    let variables = plan::build(args)?;

    if args.quiet {
        return Ok(());
    }

    output::print_header("Variables");
    println!();
    for var in &variables {
        output::print_kv(
            &var.name,
            &format!(
                "{}, {} from {}",
                output::format_variable(var.class(), var.dims()),
                output::format_size(var.encoded_len() as u64),
                var.source
            ),
            2,
        );
    }

    output::print_header("MAT Output");
    println!();
    match args.output {
        Some(ref path) => output::print_kv("Output file", &path.display().to_string(), 2),
        None => output::print_kv("Output file", "(not specified)", 2),
    }
    if let Some(ref description) = args.description {
        output::print_kv("Description", description, 2);
    }
    output::print_kv("Variables", &output::format_number(variables.len()), 2);
    output::print_kv(
        "Estimated size",
        &format!(
            "{} ({} bytes)",
            output::format_size(plan::file_len(&variables)),
            output::format_number(plan::file_len(&variables) as usize)
        ),
        2,
    );

    println!();
    output::print_success("Validation passed - ready to convert", args.quiet);
    println!();
    println!(
        "Run without {} to perform the conversion.",
        "--dry-run".cyan()
    );

    Ok(())
}
