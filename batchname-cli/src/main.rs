use anyhow::{Context, Result};
use batchname_core::interrupt::{interrupted, prompt_active, request_interrupt};
use batchname_core::{should_use_color, Config, ConflictPolicy, OutputFormatter, Preview, VersionResult};
use clap::{CommandFactory, Parser};
use std::io;
use std::path::Path;
use std::process;
use std::str::FromStr;
use tracing::debug;

mod chain;
mod cli;
mod error;
mod history;
mod logging;
mod preview;
mod rename;
mod status;
mod undo;

use cli::{Cli, Commands, OutputFormat};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    // A blocked read on the conflict prompt cannot notice the flag, so leave at once
    if let Err(e) = ctrlc::set_handler(|| {
        if prompt_active() {
            eprintln!("\nInterrupted.");
            process::exit(130);
        }
        eprintln!("\nReceived SIGINT. Finishing the current file...");
        request_interrupt();
    }) {
        eprintln!("Error setting SIGINT handler: {e}");
        process::exit(3);
    }

    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Failed to change to directory: {}", dir.display()))
            .unwrap_or_else(|e| {
                eprintln!("Error: {e:#}");
                process::exit(2);
            });
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        },
    };
    debug!(?config, "loaded configuration");

    let use_color = !cli.no_color && should_use_color(config.defaults.use_color);
    let default_preview = || Preview::from_str(&config.defaults.preview_format).unwrap_or(Preview::Table);
    let conflict_policy = |arg: Option<cli::ConflictArg>| arg.map_or(config.defaults.on_conflict, ConflictPolicy::from);

    let result = match cli.command {
        Commands::Preview {
            files,
            chain,
            preview,
            output,
        } => chain::build_request(&files, &chain).and_then(|request| {
            let format = preview.map_or_else(default_preview, Preview::from);
            preview::handle_preview(&request, format, use_color, output)
        }),

        Commands::Rename {
            files,
            chain,
            on_conflict,
            dry_run,
            preview,
            output,
            quiet,
        } => chain::build_request(&files, &chain).and_then(|request| {
            let format = preview.map_or_else(default_preview, Preview::from);
            rename::handle_rename(
                &request,
                conflict_policy(on_conflict),
                dry_run,
                format,
                cli.yes,
                use_color,
                output,
                quiet,
            )
        }),

        Commands::Undo { id, output, quiet } => {
            undo::handle_undo(&id, config.defaults.on_conflict, cli.yes, output, quiet)
        },

        Commands::History {
            limit,
            output,
            quiet,
        } => history::handle_history(limit, use_color, output, quiet),

        Commands::Status { output, quiet } => status::handle_status(output, quiet),

        Commands::Version { output } => handle_version(output),

        Commands::Completions { shell, out_dir } => handle_completions(shell, out_dir.as_deref()),
    };

    // Interrupted between files: the batch stopped early and was still recorded
    if interrupted() {
        eprintln!("Operation interrupted.");
        process::exit(130);
    }

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(error::exit_code(&e));
        },
    }
}

// Generate shell completions
pub fn generate_completions<G: clap_complete::Generator>(
    gen: G,
    cmd: &mut clap::Command,
    name: &str,
    out_dir: &Path,
) -> Result<()> {
    use clap_complete::generate_to;
    use std::fs;

    fs::create_dir_all(out_dir)?;
    let path = generate_to(gen, cmd, name, out_dir)?;
    println!("Generated completion file: {}", path.display());
    Ok(())
}

fn handle_completions(shell: clap_complete::Shell, out_dir: Option<&Path>) -> Result<()> {
    let mut cmd = Cli::command();
    match out_dir {
        Some(dir) => generate_completions(shell, &mut cmd, "batchname", dir),
        None => {
            clap_complete::generate(shell, &mut cmd, "batchname", &mut io::stdout());
            Ok(())
        },
    }
}

fn handle_version(output: OutputFormat) -> Result<()> {
    let version_result = VersionResult {
        name: "batchname".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("{}", version_result.format(output.into()));
    Ok(())
}
