use thiserror::Error;

const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const PORTABLE_FORBIDDEN: &[char] = &['<', '>', ':', '"', '\\', '|', '?', '*'];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("name is empty")]
    Empty,

    #[error("'{0}' is not a file name")]
    DotName(String),

    #[error("name contains forbidden character {0:?}")]
    ForbiddenChar(char),

    #[error("name contains a control character")]
    ControlChar,

    #[error("name is {len} bytes, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("name starts with a dot")]
    LeadingDot,

    #[error("name ends with a dot or space")]
    TrailingDotOrSpace,

    #[error("'{0}' is a reserved device name on Windows")]
    Reserved(String),
}

/// Decides whether a candidate file name is acceptable.
pub trait FilenameValidator {
    fn validate(&self, name: &str) -> Result<(), NameError>;

    fn is_valid(&self, name: &str) -> bool {
        self.validate(name).is_ok()
    }
}

/// Rules for names that should work on every common filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValidator {
    /// Also apply the Windows restrictions
    pub portable: bool,
    /// Limit in bytes
    pub max_len: usize,
    pub allow_leading_dot: bool,
}

impl Default for DefaultValidator {
    fn default() -> Self {
        Self {
            portable: true,
            max_len: 255,
            allow_leading_dot: false,
        }
    }
}

impl DefaultValidator {
    /// Only the rules the local filesystem enforces itself
    pub fn permissive() -> Self {
        Self {
            portable: false,
            ..Self::default()
        }
    }
}

/// Check if a filename is a Windows reserved name, with or without extension
pub fn is_windows_reserved(name: &str) -> bool {
    let base = name.split('.').next().unwrap_or(name).trim_end().to_uppercase();
    WINDOWS_RESERVED.contains(&base.as_str())
}

impl FilenameValidator for DefaultValidator {
    fn validate(&self, name: &str) -> Result<(), NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name == "." || name == ".." {
            return Err(NameError::DotName(name.to_string()));
        }
        if let Some(c) = name.chars().find(|c| *c == '/' || *c == '\0') {
            return Err(NameError::ForbiddenChar(c));
        }
        if name.len() > self.max_len {
            return Err(NameError::TooLong {
                len: name.len(),
                max: self.max_len,
            });
        }
        if !self.allow_leading_dot && name.starts_with('.') {
            return Err(NameError::LeadingDot);
        }

        if self.portable {
            if let Some(c) = name.chars().find(|c| PORTABLE_FORBIDDEN.contains(c)) {
                return Err(NameError::ForbiddenChar(c));
            }
            if name.chars().any(char::is_control) {
                return Err(NameError::ControlChar);
            }
            if name.ends_with('.') || name.ends_with(' ') {
                return Err(NameError::TrailingDotOrSpace);
            }
            if is_windows_reserved(name) {
                return Err(NameError::Reserved(name.to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_names() {
        let validator = DefaultValidator::default();
        for name in ["photo.jpg", "IMG_0001.JPG", "my file (2).txt", "Αθήνα.png", "a"] {
            assert!(validator.is_valid(name), "{} should be valid", name);
        }
    }

    #[test]
    fn test_rejects_basic_problems() {
        let validator = DefaultValidator::default();
        assert_eq!(validator.validate(""), Err(NameError::Empty));
        assert_eq!(validator.validate(".."), Err(NameError::DotName("..".to_string())));
        assert_eq!(validator.validate("a/b.txt"), Err(NameError::ForbiddenChar('/')));
        assert_eq!(validator.validate(".txt"), Err(NameError::LeadingDot));
        assert!(matches!(
            validator.validate(&"x".repeat(256)),
            Err(NameError::TooLong { len: 256, max: 255 })
        ));
    }

    #[test]
    fn test_portable_rules() {
        let validator = DefaultValidator::default();
        assert_eq!(validator.validate("a:b.txt"), Err(NameError::ForbiddenChar(':')));
        assert_eq!(validator.validate("tab\there"), Err(NameError::ControlChar));
        assert_eq!(validator.validate("name."), Err(NameError::TrailingDotOrSpace));
        assert_eq!(validator.validate("name "), Err(NameError::TrailingDotOrSpace));
        assert!(matches!(validator.validate("con.txt"), Err(NameError::Reserved(_))));
        assert!(matches!(validator.validate("LPT1"), Err(NameError::Reserved(_))));
        assert!(validator.is_valid("console.txt"));
    }

    #[test]
    fn test_permissive_allows_windows_only_problems() {
        let validator = DefaultValidator::permissive();
        assert!(validator.is_valid("a:b.txt"));
        assert!(validator.is_valid("CON"));
        assert!(!validator.is_valid("a/b"));
    }

    #[test]
    fn test_leading_dot_allowed() {
        let validator = DefaultValidator {
            allow_leading_dot: true,
            ..DefaultValidator::default()
        };
        assert!(validator.is_valid(".env"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            NameError::TooLong { len: 300, max: 255 }.to_string(),
            "name is 300 bytes, limit is 255"
        );
        assert_eq!(NameError::ForbiddenChar('?').to_string(), "name contains forbidden character '?'");
    }
}
