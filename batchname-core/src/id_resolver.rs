use crate::history::{HistoryManager, HistoryStore};
use anyhow::Result;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No rename history found")]
    EmptyHistory,
    #[error("Every recorded batch has already been undone")]
    NothingToUndo,
    #[error("History entry '{0}' not found")]
    NotFound(String),
}

/// Resolve an id argument (a full id, a unique prefix or `latest`) to an
/// operation id present in history.
pub fn resolve_id<S: HistoryStore>(id: &str, history: &HistoryManager<S>) -> Result<String> {
    if id == "latest" {
        if history.list(Some(1))?.is_empty() {
            return Err(ResolveError::EmptyHistory.into());
        }
        return history
            .latest_undoable()?
            .map(|batch| batch.operation_id)
            .ok_or_else(|| ResolveError::NothingToUndo.into());
    }

    history
        .find(id)?
        .map(|batch| batch.operation_id)
        .ok_or_else(|| ResolveError::NotFound(id.to_string()).into())
}
