use anyhow::Result;
use batchname_core::interrupt::PromptGuard;
use batchname_core::{
    preview_operation, rename_operation, write_preview, BatchRequest, ConflictAction, ConflictPolicy,
    ConflictPrompt, FixedPolicy, OutputFormatter, Preview,
};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Asks on the terminal what to do with an existing destination
pub struct TerminalPrompt;

impl ConflictPrompt for TerminalPrompt {
    fn resolve(&mut self, target: &Path) -> ConflictAction {
        let _guard = PromptGuard::activate();
        prompt_conflict_with_input(target, &mut io::stdin().lock(), &mut io::stderr())
    }
}

fn prompt_conflict_with_input<R: BufRead, W: Write>(target: &Path, reader: &mut R, writer: &mut W) -> ConflictAction {
    loop {
        let _ = write!(
            writer,
            "{} already exists. [o]verwrite, [s]kip, skip [a]ll, [c]ancel: ",
            target.display()
        );
        let _ = writer.flush();

        let mut input = String::new();
        match reader.read_line(&mut input) {
            Ok(0) | Err(_) => return ConflictAction::Cancel,
            Ok(_) => {},
        }
        match input.trim().to_lowercase().as_str() {
            "o" | "overwrite" => return ConflictAction::Overwrite,
            "" | "s" | "skip" => return ConflictAction::Skip,
            "a" | "all" | "skip-all" => return ConflictAction::SkipAll,
            "c" | "cancel" => return ConflictAction::Cancel,
            _ => {
                let _ = writeln!(writer, "Please answer o, s, a or c.");
            },
        }
    }
}

/// Pick the conflict handler: a fixed policy, or the terminal when someone can answer
pub fn conflict_prompt(policy: ConflictPolicy, interactive: bool) -> Box<dyn ConflictPrompt> {
    match policy.action() {
        Some(action) => Box::new(FixedPolicy(action)),
        None if interactive => Box::new(TerminalPrompt),
        None => Box::new(FixedPolicy(ConflictAction::SkipAll)),
    }
}

fn confirm_with_input<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<bool> {
    write!(writer, "Rename these files? [y/N]: ")?;
    writer.flush()?;

    let mut response = String::new();
    reader.read_line(&mut response)?;
    Ok(matches!(response.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[allow(clippy::too_many_arguments)]
#[allow(clippy::fn_params_excessive_bools)]
pub fn handle_rename(
    request: &BatchRequest,
    policy: ConflictPolicy,
    dry_run: bool,
    preview: Preview,
    yes: bool,
    use_color: bool,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let json = output == OutputFormat::Json;
    let show = !json && !quiet;
    let interactive = io::stdin().is_terminal() && !yes && !json;

    if dry_run || !yes {
        if json && !dry_run {
            return Err(CliError::InvalidInput("--output json needs --yes or --dry-run".to_string()).into());
        }

        let preview_output = preview_operation(request, None)?;
        if show && preview != Preview::None {
            write_preview(&preview_output.preview, preview, Some(use_color))?;
        }

        if !dry_run && !preview_output.preview.has_blocking_error {
            if preview_output.preview.counts.valid == 0 {
                if show {
                    println!("Nothing to rename");
                }
                return Ok(());
            }
            if !confirm_with_input(&mut io::stdin().lock(), &mut io::stdout())? {
                if show {
                    println!("Operation cancelled.");
                }
                return Ok(());
            }
        }
    }

    let mut prompt = conflict_prompt(policy, interactive);
    let result = rename_operation(request, prompt.as_mut(), dry_run, None)?;

    if json {
        println!("{}", result.format_json());
    } else if !quiet {
        print!("{}", result.format_summary());
    }

    if !result.is_complete() && !dry_run {
        return Err(CliError::Incomplete(format!("{} of {} files renamed", result.renamed(), result.total())).into());
    }
    Ok(())
}
