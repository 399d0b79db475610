use crate::provider::Metadata;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Rendered when metadata is missing or the requested key is absent
pub const UNKNOWN_TOKEN: &str = "unknown";

/// Rendered when a date cannot be parsed or the date field is not known
pub const DATE_ERROR_TOKEN: &str = "invalid_date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataCategory {
    Hash,
    #[serde(alias = "file_dates")]
    FileDate,
    Exif,
    #[serde(other)]
    Other,
}

impl std::str::FromStr for MetadataCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hash" => Ok(Self::Hash),
            "file_date" | "file_dates" | "date" => Ok(Self::FileDate),
            "exif" => Ok(Self::Exif),
            _ => Err(format!("Unknown metadata category: {}", s)),
        }
    }
}

/// Render a metadata value for use in a file name.
pub fn render_metadata(category: MetadataCategory, field: &str, metadata: Option<&Metadata>) -> String {
    let Some(metadata) = metadata else {
        return UNKNOWN_TOKEN.to_string();
    };

    let value = match category {
        MetadataCategory::Hash => metadata
            .get(&format!("hash_{}", field))
            .or_else(|| metadata.get(field))
            .cloned(),
        MetadataCategory::FileDate => {
            return match metadata.get("modified") {
                Some(raw) => format_date(raw, field),
                None => UNKNOWN_TOKEN.to_string(),
            };
        },
        MetadataCategory::Exif => metadata
            .get(field)
            .or_else(|| metadata.get(&format!("EXIF:{}", field)))
            .cloned(),
        MetadataCategory::Other => None,
    };

    match value {
        Some(value) => sanitize(&value),
        None => UNKNOWN_TOKEN.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y:%m:%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn format_date(raw: &str, field: &str) -> String {
    let Some(date) = parse_date(raw) else {
        return DATE_ERROR_TOKEN.to_string();
    };

    let fmt = match field {
        "iso" => "%Y-%m-%d",
        "yymmdd" => "%y%m%d",
        "yyyymmdd" => "%Y%m%d",
        "yyyy" => "%Y",
        "mm" => "%m",
        "dd" => "%d",
        "hhmmss" => "%H%M%S",
        "eu" => "%d-%m-%Y",
        "us" => "%m-%d-%Y",
        "iso_time" => "%Y-%m-%d_%H-%M-%S",
        _ => return DATE_ERROR_TOKEN.to_string(),
    };
    date.format(fmt).to_string()
}

/// Replace characters that cannot appear in file names
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
