use crate::config::STATE_DIR_NAME;
use crate::execute::RenameOutcome;
use crate::provider::Metadata;
use anyhow::{anyhow, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Bad input given to a scan
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),
    #[error("Invalid glob pattern: {pattern}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// One file taking part in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File name including the extension
    pub current_name: String,
    /// Extension without the leading dot, empty when there is none
    pub extension: String,
    /// Absolute path of the file
    pub full_path: PathBuf,
    pub is_selected: bool,
    /// Lazily populated by a metadata provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl FileRecord {
    /// Build a record from a path. Relative paths are resolved against the
    /// current directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .context("Failed to read current directory")?
                .join(path)
        };

        let current_name = full_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Path has no valid UTF-8 file name: {}", path.display()))?
            .to_string();

        let extension = full_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            current_name,
            extension,
            full_path,
            is_selected: true,
            metadata: None,
        })
    }

    /// The name without its extension
    pub fn base_name(&self) -> &str {
        if self.extension.is_empty() {
            return &self.current_name;
        }
        self.current_name
            .strip_suffix(&self.extension)
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or(&self.current_name)
    }

    /// Update name and path after a successful rename.
    ///
    /// Returns false (and leaves the record alone) when the outcome does not
    /// belong to this record or was not a success.
    pub fn apply_outcome(&mut self, outcome: &RenameOutcome) -> bool {
        if !outcome.is_success() || outcome.old_path != self.full_path {
            return false;
        }
        let Some(name) = outcome.new_path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.current_name = name.to_string();
        self.extension = outcome
            .new_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        self.full_path.clone_from(&outcome.new_path);
        // Old metadata described the same content but a stale path
        self.metadata = None;
        true
    }
}

/// Options controlling how paths are expanded into file records
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Glob patterns on the file name; empty means everything
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    /// Descend into subdirectories of directory arguments
    pub recursive: bool,
    /// Include files whose name starts with a dot
    pub hidden: bool,
}

pub fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ScanError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    Ok(Some(builder.build()?))
}

/// Expand files and directories into file records.
///
/// Explicit file arguments are always taken. Directory contents are listed in
/// name order, filtered by the include/exclude globs and the hidden flag.
/// The same file is never listed twice, and nothing inside a `.batchname`
/// state directory is ever listed.
pub fn scan_files(paths: &[PathBuf], options: &ScanOptions) -> Result<Vec<FileRecord>> {
    let includes = build_globset(&options.includes)?;
    let excludes = build_globset(&options.excludes)?;
    let mut records: Vec<FileRecord> = Vec::new();

    for path in paths {
        if in_state_dir(path) {
            debug!("Skipping state directory path: {}", path.display());
            continue;
        }
        if path.is_file() {
            push_unique(&mut records, FileRecord::from_path(path)?);
            continue;
        }
        if !path.is_dir() {
            return Err(ScanError::PathNotFound(path.clone()).into());
        }

        let max_depth = if options.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                if entry.file_type().is_dir() && entry.file_name() == STATE_DIR_NAME {
                    return false;
                }
                options.hidden || !is_hidden(entry.file_name())
            });

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to read directory: {}", path.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(ref includes) = includes {
                if !includes.is_match(name) {
                    continue;
                }
            }
            if let Some(ref excludes) = excludes {
                if excludes.is_match(name) {
                    continue;
                }
            }
            push_unique(&mut records, FileRecord::from_path(entry.path())?);
        }
    }

    Ok(records)
}

fn push_unique(records: &mut Vec<FileRecord>, record: FileRecord) {
    if !records.iter().any(|r| r.full_path == record.full_path) {
        records.push(record);
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

fn in_state_dir(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == STATE_DIR_NAME)
}
