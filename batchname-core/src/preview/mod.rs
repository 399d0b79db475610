mod json;
mod summary;
mod table;

pub use json::render_json;
pub use summary::render_summary;
pub use table::render_table;

use crate::compose::compose_with_metadata;
use crate::file_record::FileRecord;
use crate::modules::ModuleChain;
use crate::provider::MetadataProvider;
use crate::validate::FilenameValidator;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewStatus {
    Unchanged,
    Valid,
    Invalid,
    Duplicate,
}

impl PreviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Duplicate => "duplicate",
        }
    }

    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Invalid | Self::Duplicate)
    }
}

/// Old and new name of one file with its validation status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewPair {
    pub old_name: String,
    pub new_name: String,
    pub status: PreviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Full path of the file the pair was computed for
    #[serde(skip)]
    pub source: PathBuf,
}

impl PreviewPair {
    /// Destination path, always a sibling of the source
    pub fn target(&self) -> PathBuf {
        self.source.with_file_name(&self.new_name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewCounts {
    pub valid: usize,
    pub unchanged: usize,
    pub invalid: usize,
    pub duplicate: usize,
}

impl PreviewCounts {
    pub fn total(&self) -> usize {
        self.valid + self.unchanged + self.invalid + self.duplicate
    }

    fn add(&mut self, status: PreviewStatus) {
        match status {
            PreviewStatus::Valid => self.valid += 1,
            PreviewStatus::Unchanged => self.unchanged += 1,
            PreviewStatus::Invalid => self.invalid += 1,
            PreviewStatus::Duplicate => self.duplicate += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResult {
    pub pairs: Vec<PreviewPair>,
    pub counts: PreviewCounts,
    pub has_blocking_error: bool,
}

/// Compose and validate the new name of every selected file.
///
/// Nothing is written to disk; running it twice over the same input gives the
/// same result. The counter index is the position among selected files.
pub fn build_preview(
    files: &[FileRecord],
    chain: &ModuleChain,
    provider: &dyn MetadataProvider,
    validator: &dyn FilenameValidator,
) -> PreviewResult {
    let needs_metadata = chain.needs_metadata();

    let composed: Vec<(&FileRecord, String)> = files
        .iter()
        .filter(|f| f.is_selected)
        .enumerate()
        .map(|(index, file)| {
            let fetched = if needs_metadata && file.metadata.is_none() {
                provider.metadata(&file.full_path)
            } else {
                None
            };
            let metadata = fetched.as_ref().or(file.metadata.as_ref());
            (file, compose_with_metadata(chain, file, index, metadata))
        })
        .collect();

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for (_, new_name) in &composed {
        *occurrences.entry(new_name.as_str()).or_insert(0) += 1;
    }

    let mut counts = PreviewCounts::default();
    let pairs: Vec<PreviewPair> = composed
        .iter()
        .map(|(file, new_name)| {
            let (status, reason) = if *new_name == file.current_name {
                (PreviewStatus::Unchanged, None)
            } else if let Err(e) = validator.validate(new_name) {
                (PreviewStatus::Invalid, Some(e.to_string()))
            } else if occurrences[new_name.as_str()] > 1 {
                (PreviewStatus::Duplicate, None)
            } else {
                (PreviewStatus::Valid, None)
            };
            counts.add(status);

            PreviewPair {
                old_name: file.current_name.clone(),
                new_name: new_name.clone(),
                status,
                reason,
                source: file.full_path.clone(),
            }
        })
        .collect();

    PreviewResult {
        has_blocking_error: counts.invalid > 0 || counts.duplicate > 0,
        pairs,
        counts,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preview {
    Table,
    Json,
    Summary,
    None,
}

impl std::str::FromStr for Preview {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "summary" => Ok(Self::Summary),
            "none" => Ok(Self::None),
            _ => Err(format!("Invalid preview format: {}", s)),
        }
    }
}

/// Determine whether to use colors based on explicit preference or terminal detection
pub fn should_use_color_with_detector<F>(use_color: Option<bool>, is_terminal: F) -> bool
where
    F: Fn() -> bool,
{
    match use_color {
        Some(explicit_color) => explicit_color,
        None => is_terminal(),
    }
}

pub fn should_use_color(use_color: Option<bool>) -> bool {
    should_use_color_with_detector(use_color, || io::stdout().is_terminal())
}

/// Render a preview in the requested format
pub fn render_preview(result: &PreviewResult, format: Preview, use_color: Option<bool>) -> String {
    let use_color = should_use_color(use_color);

    match format {
        Preview::Table => render_table(result, use_color),
        Preview::Json => render_json(result),
        Preview::Summary => render_summary(result),
        Preview::None => String::new(),
    }
}

/// Write a preview to stdout
pub fn write_preview(result: &PreviewResult, format: Preview, use_color: Option<bool>) -> Result<()> {
    let output = render_preview(result, format, use_color);
    let mut stdout = io::stdout();
    write!(stdout, "{}", output)?;
    stdout.flush()?;
    Ok(())
}
