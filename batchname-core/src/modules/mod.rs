//! Rename modules: the typed stages of a rename chain.
//!
//! Each [`ModuleSpec`] produces a name fragment for a file at a given position
//! in the batch, or reports that it is not effective. Rendering never fails:
//! broken configuration shows up as a sentinel fragment in the preview.

mod counter;
mod metadata;
mod text;

pub use counter::{render_counter, CounterSpec, CounterValue, COUNTER_SENTINEL};
pub use metadata::{render_metadata, MetadataCategory, DATE_ERROR_TOKEN, UNKNOWN_TOKEN};
pub use text::{remove_text, RemovalScope};

use crate::case_model::{transform, CaseStyle, SeparatorStyle};
use crate::provider::Metadata;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fragment rendered by modules whose configuration could not be decoded
pub const INVALID_TOKEN: &str = "invalid";

/// Module type tags accepted in chain files
pub const MODULE_TYPES: &[&str] = &[
    "literal_text",
    "counter",
    "metadata_field",
    "original_name",
    "text_removal",
    "invalid",
];

/// One stage of a rename chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleSpec {
    LiteralText {
        #[serde(default)]
        text: String,
    },
    Counter(CounterSpec),
    MetadataField {
        category: MetadataCategory,
        #[serde(default)]
        field: String,
    },
    OriginalName {
        #[serde(default)]
        case: CaseStyle,
        #[serde(default)]
        separator: SeparatorStyle,
        #[serde(default)]
        transliterate: bool,
    },
    TextRemoval {
        #[serde(default)]
        pattern: String,
        #[serde(default)]
        scope: RemovalScope,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
    /// A module of a known type whose fields could not be decoded
    Invalid {
        type_name: String,
        #[serde(default)]
        reason: String,
    },
}

fn default_true() -> bool {
    true
}

/// What a module produced for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    NotEffective,
}

/// Per-file inputs available to modules
#[derive(Debug, Clone, Copy)]
pub struct ModuleContext<'a> {
    /// Original name without extension
    pub base_name: &'a str,
    /// Position of the file in the batch
    pub index: usize,
    pub metadata: Option<&'a Metadata>,
}

impl ModuleSpec {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::LiteralText { text: text.into() }
    }

    pub fn counter(start: i64, step: i64, padding: i64) -> Self {
        Self::Counter(CounterSpec::new(start, step, padding))
    }

    pub fn metadata(category: MetadataCategory, field: impl Into<String>) -> Self {
        Self::MetadataField {
            category,
            field: field.into(),
        }
    }

    pub fn original_name(case: CaseStyle, separator: SeparatorStyle, transliterate: bool) -> Self {
        Self::OriginalName {
            case,
            separator,
            transliterate,
        }
    }

    pub fn text_removal(pattern: impl Into<String>, scope: RemovalScope) -> Self {
        Self::TextRemoval {
            pattern: pattern.into(),
            scope,
            case_sensitive: true,
        }
    }

    /// Type tag as written in chain files
    pub fn type_name(&self) -> &str {
        match self {
            Self::LiteralText { .. } => "literal_text",
            Self::Counter(_) => "counter",
            Self::MetadataField { .. } => "metadata_field",
            Self::OriginalName { .. } => "original_name",
            Self::TextRemoval { .. } => "text_removal",
            Self::Invalid { .. } => "invalid",
        }
    }

    /// Whether the module changes anything on its own account
    pub fn is_effective(&self) -> bool {
        match self {
            Self::LiteralText { text } => !text.trim().is_empty(),
            Self::OriginalName {
                case,
                separator,
                transliterate,
            } => *case != CaseStyle::Original || *separator != SeparatorStyle::AsIs || *transliterate,
            Self::TextRemoval { pattern, .. } => !pattern.is_empty(),
            Self::Counter(_) | Self::MetadataField { .. } | Self::Invalid { .. } => true,
        }
    }

    /// Render this module for one file
    pub fn render(&self, ctx: &ModuleContext<'_>) -> Fragment {
        if !self.is_effective() {
            return Fragment::NotEffective;
        }

        let text = match self {
            Self::LiteralText { text } => text.clone(),
            Self::Counter(spec) => render_counter(spec, ctx.index),
            Self::MetadataField { category, field } => render_metadata(*category, field, ctx.metadata),
            Self::OriginalName {
                case,
                separator,
                transliterate,
            } => {
                let source = if *transliterate {
                    crate::transliterate::greek_to_latin(ctx.base_name)
                } else {
                    ctx.base_name.to_string()
                };
                transform(&source, *case, *separator)
            },
            Self::TextRemoval {
                pattern,
                scope,
                case_sensitive,
            } => remove_text(ctx.base_name, pattern, *scope, *case_sensitive),
            Self::Invalid { .. } => INVALID_TOKEN.to_string(),
        };

        Fragment::Text(text)
    }
}

/// Final case/separator pass over the whole composed base name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostTransform {
    #[serde(default)]
    pub case: CaseStyle,
    #[serde(default)]
    pub separator: SeparatorStyle,
}

impl PostTransform {
    pub fn new(case: CaseStyle, separator: SeparatorStyle) -> Self {
        Self { case, separator }
    }

    pub fn is_noop(&self) -> bool {
        self.case == CaseStyle::Original && self.separator == SeparatorStyle::AsIs
    }

    pub fn apply(&self, text: &str) -> String {
        transform(text, self.case, self.separator)
    }
}

/// Ordered modules plus the post transform: the exchanged module configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleChain {
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
    #[serde(default)]
    pub post_transform: PostTransform,
}

#[derive(Deserialize)]
struct RawChain {
    #[serde(default)]
    modules: Vec<serde_json::Value>,
    #[serde(default)]
    post_transform: PostTransform,
}

impl ModuleChain {
    pub fn new(modules: Vec<ModuleSpec>) -> Self {
        Self {
            modules,
            post_transform: PostTransform::default(),
        }
    }

    #[must_use]
    pub fn with_post_transform(mut self, post_transform: PostTransform) -> Self {
        self.post_transform = post_transform;
        self
    }

    /// Whether any module reads file metadata
    pub fn needs_metadata(&self) -> bool {
        self.modules
            .iter()
            .any(|m| matches!(m, ModuleSpec::MetadataField { .. }))
    }

    /// Parse a chain from its JSON form.
    ///
    /// Entries with an unknown or missing `type` are skipped with a warning.
    /// Entries of a known type that fail to decode become
    /// [`ModuleSpec::Invalid`] so the chain still renders. Only a document that
    /// is not a chain object at all is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawChain = serde_json::from_str(json).context("Failed to parse module chain")?;
        let mut modules = Vec::with_capacity(raw.modules.len());

        for (position, value) in raw.modules.into_iter().enumerate() {
            let type_name = value
                .get("type")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);

            let Some(type_name) = type_name.filter(|t| MODULE_TYPES.contains(&t.as_str())) else {
                warn!(position, module = %value, "skipping module with unknown type");
                continue;
            };

            match serde_json::from_value::<ModuleSpec>(value) {
                Ok(module) => modules.push(module),
                Err(e) => {
                    warn!(position, module = %type_name, error = %e, "module configuration is malformed");
                    modules.push(ModuleSpec::Invalid {
                        type_name,
                        reason: e.to_string(),
                    });
                },
            }
        }

        Ok(Self {
            modules,
            post_transform: raw.post_transform,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a chain file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read module chain: {}", path.display()))?;
        Self::from_json(&content)
    }
}
