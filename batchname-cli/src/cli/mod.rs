pub mod args;
pub mod types;

pub use args::{ChainArgs, Cli, Commands, FileArgs};
pub use types::{ConflictArg, OutputFormat};
