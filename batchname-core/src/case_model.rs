use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Case folding applied to a name or to each word of a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    #[default]
    Original,
    Lower,
    Upper,
    Capitalize, // First letter of the name upper, the rest lower
    Camel,
    Pascal,
    Title, // Every word capitalized
}

/// Separator placed between words of a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeparatorStyle {
    #[default]
    #[serde(alias = "as_is", alias = "none")]
    AsIs,
    Snake,
    Kebab,
    Space,
}

impl SeparatorStyle {
    fn joiner(self) -> &'static str {
        match self {
            Self::AsIs => "",
            Self::Snake => "_",
            Self::Kebab => "-",
            Self::Space => " ",
        }
    }
}

impl FromStr for CaseStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "original" | "keep" => Ok(Self::Original),
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            "capitalize" => Ok(Self::Capitalize),
            "camel" => Ok(Self::Camel),
            "pascal" => Ok(Self::Pascal),
            "title" => Ok(Self::Title),
            _ => Err(format!("Invalid case style: {}", s)),
        }
    }
}

impl FromStr for SeparatorStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "as-is" | "as_is" | "none" => Ok(Self::AsIs),
            "snake" => Ok(Self::Snake),
            "kebab" => Ok(Self::Kebab),
            "space" => Ok(Self::Space),
            _ => Err(format!("Invalid separator style: {}", s)),
        }
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Original => "original",
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Capitalize => "capitalize",
            Self::Camel => "camel",
            Self::Pascal => "pascal",
            Self::Title => "title",
        };
        f.write_str(name)
    }
}

impl fmt::Display for SeparatorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AsIs => "as-is",
            Self::Snake => "snake",
            Self::Kebab => "kebab",
            Self::Space => "space",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
}

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenModel {
    pub tokens: Vec<Token>,
}

impl TokenModel {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

fn is_delimiter(c: char) -> bool {
    c == '_' || c == '-' || c.is_whitespace()
}

/// Split a base name into words.
///
/// Words are separated by `_`, `-` and whitespace, and by case boundaries:
/// - lowercase to uppercase (`myPhoto` -> `my`, `Photo`)
/// - digit to uppercase (`img2Raw` -> `img2`, `Raw`)
/// - the last letter of an uppercase run followed by lowercase (`HTMLFile` -> `HTML`, `File`)
///
/// Letter to digit is never a boundary (`take12` stays one word). Any other
/// character (dots, brackets, digits) stays inside the current word so the
/// name keeps its punctuation.
pub fn parse_to_tokens(s: &str) -> TokenModel {
    let chars: Vec<char> = s.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_delimiter(c) {
            if !current.is_empty() {
                tokens.push(Token::new(std::mem::take(&mut current)));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let should_split = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_ascii_digit() && c.is_uppercase())
                || (prev.is_uppercase() && c.is_uppercase() && next.is_some_and(char::is_lowercase));

            if should_split {
                tokens.push(Token::new(std::mem::take(&mut current)));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        tokens.push(Token::new(current));
    }

    TokenModel::new(tokens)
}

/// Render tokens with a case style, joined by the separator.
///
/// Camel and Pascal always join without a separator. `AsIs` joins with
/// nothing, so callers wanting to keep the original separators should use
/// [`transform`] instead.
pub fn to_style(model: &TokenModel, case: CaseStyle, separator: SeparatorStyle) -> String {
    if model.tokens.is_empty() {
        return String::new();
    }

    match case {
        CaseStyle::Camel => model
            .tokens
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if i == 0 {
                    t.text.to_lowercase()
                } else {
                    capitalize_first(&t.text)
                }
            })
            .collect::<String>(),

        CaseStyle::Pascal => model
            .tokens
            .iter()
            .map(|t| capitalize_first(&t.text))
            .collect::<String>(),

        CaseStyle::Original => join_words(model.tokens.iter().map(|t| t.text.clone()), separator),

        CaseStyle::Lower => join_words(model.tokens.iter().map(|t| t.text.to_lowercase()), separator),

        CaseStyle::Upper => join_words(model.tokens.iter().map(|t| t.text.to_uppercase()), separator),

        CaseStyle::Capitalize => join_words(
            model.tokens.iter().enumerate().map(|(i, t)| {
                if i == 0 {
                    capitalize_first(&t.text)
                } else {
                    t.text.to_lowercase()
                }
            }),
            separator,
        ),

        CaseStyle::Title => join_words(model.tokens.iter().map(|t| capitalize_first(&t.text)), separator),
    }
}

fn join_words(words: impl Iterator<Item = String>, separator: SeparatorStyle) -> String {
    words.collect::<Vec<_>>().join(separator.joiner())
}

/// Apply a case style and separator style to a whole name.
///
/// With `AsIs` separators the simple case styles work on the raw string so
/// the existing separators survive untouched; every other combination
/// re-tokenizes the name first.
pub fn transform(text: &str, case: CaseStyle, separator: SeparatorStyle) -> String {
    match (case, separator) {
        (CaseStyle::Original, SeparatorStyle::AsIs) => text.to_string(),
        (CaseStyle::Lower, SeparatorStyle::AsIs) => text.to_lowercase(),
        (CaseStyle::Upper, SeparatorStyle::AsIs) => text.to_uppercase(),
        (CaseStyle::Capitalize, SeparatorStyle::AsIs) => capitalize_first(text),
        (CaseStyle::Title, SeparatorStyle::AsIs) => title_in_place(text),
        _ => to_style(&parse_to_tokens(text), case, separator),
    }
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

// Capitalize every word while leaving the characters between words alone.
fn title_in_place(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = !c.is_alphanumeric();
        }
    }

    result
}
