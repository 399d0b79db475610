use anyhow::{Context, Result};
use batchname_core::{status_operation, OutputFormatter};

use crate::cli::OutputFormat;

pub fn handle_status(output: OutputFormat, quiet: bool) -> Result<()> {
    let status = status_operation(None).context("Failed to get status")?;

    match output {
        OutputFormat::Json => println!("{}", status.format_json()),
        OutputFormat::Summary => {
            if !quiet {
                print!("{}", status.format_summary());
            }
        },
    }

    Ok(())
}
