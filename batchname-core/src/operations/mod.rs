//! High-level operations that correspond to CLI commands
//!
//! These modules hold the flow of each batchname command (load config, scan,
//! lock, run the pipeline, record history), separated from CLI concerns like
//! argument parsing, prompting and output formatting.

pub mod history;
pub mod preview;
pub mod rename;
pub mod status;
pub mod undo;

pub use history::history_operation;
pub use preview::preview_operation;
pub use rename::rename_operation;
pub use status::status_operation;
pub use undo::undo_operation;

use crate::config::Config;
use crate::file_record::{scan_files, FileRecord, ScanOptions};
use crate::modules::{MetadataCategory, ModuleChain, ModuleSpec};
use crate::preview::{build_preview, PreviewResult};
use crate::provider::FsMetadataProvider;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Files and chain of one batch, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    /// Files and directories; relative paths are taken from the working directory
    pub paths: Vec<PathBuf>,
    pub scan: ScanOptions,
    pub chain: ModuleChain,
}

pub(crate) fn working_dir_or_current(working_dir: Option<&Path>) -> Result<PathBuf> {
    match working_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().context("Failed to get current directory"),
    }
}

fn scan_request(request: &BatchRequest, base: &Path) -> Result<Vec<FileRecord>> {
    let paths: Vec<PathBuf> = if request.paths.is_empty() {
        vec![base.to_path_buf()]
    } else {
        request
            .paths
            .iter()
            .map(|p| if p.is_absolute() { p.clone() } else { base.join(p) })
            .collect()
    };
    scan_files(&paths, &request.scan)
}

// Hashing reads every file, so only do it when a module asks for a hash
fn provider_for(chain: &ModuleChain) -> FsMetadataProvider {
    FsMetadataProvider {
        compute_hash: chain.modules.iter().any(|m| {
            matches!(
                m,
                ModuleSpec::MetadataField {
                    category: MetadataCategory::Hash,
                    ..
                }
            )
        }),
    }
}

pub(crate) fn preview_request(request: &BatchRequest, base: &Path, config: &Config) -> Result<PreviewResult> {
    let files = scan_request(request, base)?;
    Ok(build_preview(
        &files,
        &request.chain,
        &provider_for(&request.chain),
        &config.validator(),
    ))
}
