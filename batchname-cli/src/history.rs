use anyhow::Result;
use batchname_core::{format_history, history_operation, OutputFormatter};

use crate::cli::OutputFormat;

pub fn handle_history(limit: Option<usize>, use_color: bool, output: OutputFormat, quiet: bool) -> Result<()> {
    let result = history_operation(limit, None)?;

    match output {
        OutputFormat::Json => {
            println!("{}", result.format_json());
        },
        OutputFormat::Summary => {
            if quiet {
                return Ok(());
            }
            if result.entries.is_empty() {
                println!("{}", result.format_summary());
            } else {
                println!("{}", format_history(&result.entries, use_color));
            }
        },
    }

    Ok(())
}
