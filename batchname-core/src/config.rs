use crate::execute::ConflictAction;
use crate::validate::DefaultValidator;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Working state lives in this directory under the working directory
pub const STATE_DIR_NAME: &str = ".batchname";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// What to do when a destination already exists and nobody was asked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    #[default]
    Prompt,
    Overwrite,
    Skip,
    Cancel,
}

impl std::str::FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prompt" | "ask" => Ok(Self::Prompt),
            "overwrite" => Ok(Self::Overwrite),
            "skip" => Ok(Self::Skip),
            "cancel" => Ok(Self::Cancel),
            _ => Err(format!("Invalid conflict policy: {}", s)),
        }
    }
}

impl ConflictPolicy {
    /// The fixed answer for this policy, `None` when the user must be asked
    pub fn action(self) -> Option<ConflictAction> {
        match self {
            Self::Prompt => None,
            Self::Overwrite => Some(ConflictAction::Overwrite),
            Self::Skip => Some(ConflictAction::SkipAll),
            Self::Cancel => Some(ConflictAction::Cancel),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default preview format: "table", "json", "summary" or "none"
    #[serde(default = "default_preview")]
    pub preview_format: String,

    /// Number of batches kept in history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Reject names that would not work on Windows
    #[serde(default = "default_true")]
    pub portable_names: bool,

    /// Whether to use color output by default (None = auto-detect)
    #[serde(default)]
    pub use_color: Option<bool>,

    #[serde(default)]
    pub on_conflict: ConflictPolicy,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            preview_format: default_preview(),
            history_limit: default_history_limit(),
            portable_names: true,
            use_color: None,
            on_conflict: ConflictPolicy::default(),
        }
    }
}

fn default_preview() -> String {
    "table".to_string()
}

fn default_history_limit() -> usize {
    100
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load `.batchname/config.toml` from the current directory, or defaults
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&std::env::current_dir()?)
    }

    /// Load the config of a working directory, or defaults when it has none
    pub fn load_from_dir(working_dir: &Path) -> Result<Self> {
        let config_path = working_dir.join(STATE_DIR_NAME).join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Filename validator matching these settings
    pub fn validator(&self) -> DefaultValidator {
        DefaultValidator {
            portable: self.defaults.portable_names,
            ..DefaultValidator::default()
        }
    }
}
