use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use super::types::{CaseArg, ConflictArg, ModuleArg, OutputFormat, PreviewArg, SeparatorArg};

/// Batch file renaming with composable modules, preview and undo
#[derive(Parser, Debug)]
#[command(name = "batchname")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Run as if started in <path> instead of the current working directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Assume yes for all prompts
    #[arg(short = 'y', long = "yes", global = true, env = "BATCHNAME_YES")]
    pub yes: bool,
}

/// Which files take part in a batch
#[derive(Args, Debug, Clone, Default)]
pub struct FileArgs {
    /// Files and directories to rename. Defaults to the current directory
    pub paths: Vec<PathBuf>,

    /// Only file names matching these globs
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Skip file names matching these globs
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Descend into subdirectories
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Include files whose name starts with a dot
    #[arg(long)]
    pub hidden: bool,
}

/// How the new names are built
#[derive(Args, Debug, Clone, Default)]
pub struct ChainArgs {
    /// Module chain file (JSON)
    #[arg(long, value_name = "FILE")]
    pub chain: Option<PathBuf>,

    /// Append a module: text:<t>, counter:<start>[:<step>[:<pad>]],
    /// meta:<category>:<field>, original[:<case>[:<sep>[:translit]]],
    /// remove:<pattern>[:<scope>[:i]]
    #[arg(short = 'm', long = "module", value_name = "SPEC", verbatim_doc_comment)]
    pub modules: Vec<ModuleArg>,

    /// Case applied to the whole name after the modules
    #[arg(long, value_enum)]
    pub case: Option<CaseArg>,

    /// Separator applied to the whole name after the modules
    #[arg(long, value_enum)]
    pub separator: Option<SeparatorArg>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the new names without renaming anything
    Preview {
        #[command(flatten)]
        files: FileArgs,

        #[command(flatten)]
        chain: ChainArgs,

        /// Preview format (defaults from config if not specified)
        #[arg(long, value_enum)]
        preview: Option<PreviewArg>,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },

    /// Preview, confirm and rename
    Rename {
        #[command(flatten)]
        files: FileArgs,

        #[command(flatten)]
        chain: ChainArgs,

        /// What to do when a destination already exists (defaults from config)
        #[arg(long, value_enum)]
        on_conflict: Option<ConflictArg>,

        /// Show preview only, don't rename
        #[arg(long)]
        dry_run: bool,

        /// Preview shown before the confirmation prompt
        #[arg(long, value_enum)]
        preview: Option<PreviewArg>,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },

    /// Undo a previous rename batch
    Undo {
        /// Operation ID or unique prefix (use 'latest' for the most recent batch not yet undone)
        #[arg(default_value = "latest")]
        id: String,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },

    /// Show rename history
    History {
        /// Limit number of entries
        #[arg(long)]
        limit: Option<usize>,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },

    /// Show state directory, history and lock status
    Status {
        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },

    /// Show version information
    Version {
        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },

    /// Generate shell completion scripts
    Completions {
        shell: Shell,

        /// Write the script into this directory instead of stdout
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
}
