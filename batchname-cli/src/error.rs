use batchname_core::{ResolveError, ScanError};
use thiserror::Error;

/// Failures that map to a specific exit status
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad arguments or an unusable chain
    #[error("{0}")]
    InvalidInput(String),
    /// The command ran but not every file ended up where it should
    #[error("{0}")]
    Incomplete(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Incomplete(_) => 1,
            Self::InvalidInput(_) => 2,
        }
    }
}

/// 0 success, 1 partial failure or conflicts, 2 invalid input, 3 internal error
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<CliError>() {
        return e.exit_code();
    }
    if error.downcast_ref::<ResolveError>().is_some() || error.downcast_ref::<ScanError>().is_some() {
        return 2;
    }
    3
}
