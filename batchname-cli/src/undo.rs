use anyhow::Result;
use batchname_core::{undo_operation, ConflictPolicy, OutputFormatter};
use std::io::{self, IsTerminal};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::rename::conflict_prompt;

pub fn handle_undo(id: &str, policy: ConflictPolicy, yes: bool, output: OutputFormat, quiet: bool) -> Result<()> {
    let interactive = io::stdin().is_terminal() && !yes && output == OutputFormat::Summary;
    let mut prompt = conflict_prompt(policy, interactive);
    let result = undo_operation(id, prompt.as_mut(), None)?;

    match output {
        OutputFormat::Json => println!("{}", result.format_json()),
        OutputFormat::Summary => {
            if !quiet {
                print!("{}", result.format_summary());
            }
        },
    }

    if !result.success {
        return Err(CliError::Incomplete(format!("Undo of {} did not restore every file", result.operation_id)).into());
    }
    Ok(())
}
