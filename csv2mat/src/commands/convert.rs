//! Main conversion command.

use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use matwrite::MatWriter;

use crate::cli::Args;
use crate::output;
use crate::plan::{self, Variable};

/// Run the convert command.
pub fn run(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    let output_path = args
        .output
        .as_ref()
        .context("Output file is required")?;

    let variables = plan::build(args)?;

    output::print_verbose(
        &format!(
            "Writing {} variables to {}",
            variables.len(),
            output_path.display()
        ),
        args.verbose,
    );

    let mut builder = MatWriter::builder().overwrite(args.force);
    if let Some(ref description) = args.description {
        builder = builder.description(description.as_str());
    }

    let mut writer = builder
        .create(output_path)
        .with_context(|| {
            format!(
                "Failed to create output file: {}",
                output_path.display()
            )
        })?;

    for var in &variables {
        output::print_verbose(
            &format!(
                "{} ({}) from {}",
                var.name,
                output::format_variable(var.class(), var.dims()),
                var.source
            ),
            args.verbose,
        );

        var.write_to(&mut writer)
            .with_context(|| format!("Failed to write variable '{}'", var.name))?;
    }

    writer.close().context("Failed to close output file")?;

    let bytes = std::fs::metadata(output_path)
        .map(|m| m.len())
        .unwrap_or_else(|_| plan::file_len(&variables));
    info!("wrote {} ({} bytes)", output_path.display(), bytes);

    if !args.quiet {
        print_summary(args, &variables, bytes, start_time.elapsed());
    }

    Ok(())
}

/// Print conversion summary.
fn print_summary(args: &Args, variables: &[Variable], bytes: u64, elapsed: std::time::Duration) {
    let output_path = args
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    println!();
    output::print_success(&format!("Wrote {}", output_path), false);

    println!();
    output::print_kv(
        "Variables written",
        &output::format_number(variables.len()),
        2,
    );
    output::print_kv("File size", &output::format_size(bytes), 2);
    output::print_kv("Processing time", &format!("{:.2?}", elapsed), 2);
}
