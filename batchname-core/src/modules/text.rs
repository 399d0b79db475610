use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

/// Which occurrences of the pattern a text removal strips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalScope {
    First,
    Last,
    #[default]
    All,
    /// Only when the name starts with the pattern
    Start,
    /// Only when the name ends with the pattern
    End,
}

impl std::str::FromStr for RemovalScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "all" => Ok(Self::All),
            "start" | "prefix" => Ok(Self::Start),
            "end" | "suffix" => Ok(Self::End),
            _ => Err(format!("Unknown removal scope: {}", s)),
        }
    }
}

/// Remove `pattern` from `base` according to `scope`.
///
/// The pattern is literal text, never a regex.
pub fn remove_text(base: &str, pattern: &str, scope: RemovalScope, case_sensitive: bool) -> String {
    if pattern.is_empty() {
        return base.to_string();
    }

    let escaped = regex::escape(pattern);
    let source = match scope {
        RemovalScope::Start => format!("^(?:{})", escaped),
        RemovalScope::End => format!("(?:{})$", escaped),
        _ => escaped,
    };
    let regex = match RegexBuilder::new(&source).case_insensitive(!case_sensitive).build() {
        Ok(regex) => regex,
        // An escaped literal always compiles; keep the name if it somehow does not
        Err(_) => return base.to_string(),
    };

    let target = match scope {
        RemovalScope::All => return regex.replace_all(base, "").into_owned(),
        RemovalScope::First | RemovalScope::Start | RemovalScope::End => regex.find(base),
        RemovalScope::Last => regex.find_iter(base).last(),
    };

    match target {
        Some(m) => format!("{}{}", &base[..m.start()], &base[m.end()..]),
        None => base.to_string(),
    }
}
