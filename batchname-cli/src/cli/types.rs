use batchname_core::{
    CaseStyle, ConflictPolicy, MetadataCategory, ModuleSpec, Preview, RemovalScope, SeparatorStyle,
};
use clap::ValueEnum;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CaseArg {
    Original,
    Lower,
    Upper,
    Capitalize,
    Camel,
    Pascal,
    Title,
}

impl From<CaseArg> for CaseStyle {
    fn from(arg: CaseArg) -> Self {
        match arg {
            CaseArg::Original => Self::Original,
            CaseArg::Lower => Self::Lower,
            CaseArg::Upper => Self::Upper,
            CaseArg::Capitalize => Self::Capitalize,
            CaseArg::Camel => Self::Camel,
            CaseArg::Pascal => Self::Pascal,
            CaseArg::Title => Self::Title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeparatorArg {
    AsIs,
    Snake,
    Kebab,
    Space,
}

impl From<SeparatorArg> for SeparatorStyle {
    fn from(arg: SeparatorArg) -> Self {
        match arg {
            SeparatorArg::AsIs => Self::AsIs,
            SeparatorArg::Snake => Self::Snake,
            SeparatorArg::Kebab => Self::Kebab,
            SeparatorArg::Space => Self::Space,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictArg {
    /// Ask for every existing destination
    Prompt,
    Overwrite,
    Skip,
    Cancel,
}

impl From<ConflictArg> for ConflictPolicy {
    fn from(arg: ConflictArg) -> Self {
        match arg {
            ConflictArg::Prompt => Self::Prompt,
            ConflictArg::Overwrite => Self::Overwrite,
            ConflictArg::Skip => Self::Skip,
            ConflictArg::Cancel => Self::Cancel,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PreviewArg {
    Table,
    Summary,
    None,
}

impl From<PreviewArg> for Preview {
    fn from(arg: PreviewArg) -> Self {
        match arg {
            PreviewArg::Table => Self::Table,
            PreviewArg::Summary => Self::Summary,
            PreviewArg::None => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

impl From<OutputFormat> for batchname_core::OutputFormat {
    fn from(arg: OutputFormat) -> Self {
        match arg {
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// A module given on the command line.
///
/// Forms:
/// `text:<text>`, `counter:<start>[:<step>[:<padding>]]`,
/// `meta:<category>:<field>`, `original[:<case>[:<separator>[:translit]]]`,
/// `remove:<pattern>[:<scope>[:i]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleArg(pub ModuleSpec);

fn parse_number(value: &str, what: &str) -> Result<i64, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid counter {}: {}", what, value))
}

impl FromStr for ModuleArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = match s.split_once(':') {
            Some((kind, rest)) => (kind, Some(rest)),
            None => (s, None),
        };

        let spec = match (kind.to_lowercase().as_str(), rest) {
            ("text", Some(text)) => ModuleSpec::literal(text),
            ("counter", rest) => {
                let parts: Vec<&str> = rest.map(|r| r.split(':').collect()).unwrap_or_default();
                if parts.len() > 3 {
                    return Err(format!("Too many counter fields: {}", s));
                }
                let field = |i: usize, what: &str, default: i64| {
                    parts
                        .get(i)
                        .filter(|p| !p.is_empty())
                        .map_or(Ok(default), |p| parse_number(p, what))
                };
                ModuleSpec::counter(field(0, "start", 1)?, field(1, "step", 1)?, field(2, "padding", 0)?)
            },
            ("meta", Some(rest)) => {
                let (category, field) = rest
                    .split_once(':')
                    .ok_or_else(|| format!("Expected meta:<category>:<field>, got {}", s))?;
                ModuleSpec::metadata(MetadataCategory::from_str(category)?, field)
            },
            ("original", rest) => {
                let parts: Vec<&str> = rest.map(|r| r.split(':').collect()).unwrap_or_default();
                let case = match parts.first() {
                    Some(p) if !p.is_empty() => CaseStyle::from_str(p)?,
                    _ => CaseStyle::Original,
                };
                let separator = match parts.get(1) {
                    Some(p) if !p.is_empty() => SeparatorStyle::from_str(p)?,
                    _ => SeparatorStyle::AsIs,
                };
                let transliterate = match parts.get(2) {
                    None => false,
                    Some(&"translit") => true,
                    Some(other) => return Err(format!("Unknown original-name option: {}", other)),
                };
                ModuleSpec::original_name(case, separator, transliterate)
            },
            ("remove", Some(rest)) => {
                let mut parts = rest.splitn(3, ':');
                let pattern = parts.next().unwrap_or_default();
                if pattern.is_empty() {
                    return Err("remove needs a pattern".to_string());
                }
                let scope = match parts.next() {
                    Some(p) if !p.is_empty() => RemovalScope::from_str(p)?,
                    _ => RemovalScope::All,
                };
                let case_sensitive = match parts.next() {
                    None => true,
                    Some("i") => false,
                    Some(other) => return Err(format!("Unknown removal option: {}", other)),
                };
                ModuleSpec::TextRemoval {
                    pattern: pattern.to_string(),
                    scope,
                    case_sensitive,
                }
            },
            _ => {
                return Err(format!(
                    "Invalid module '{}'. Use text:, counter:, meta:, original or remove:",
                    s
                ))
            },
        };

        Ok(Self(spec))
    }
}
