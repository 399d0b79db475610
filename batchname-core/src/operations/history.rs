use super::working_dir_or_current;
use crate::config::{Config, STATE_DIR_NAME};
use crate::history::{HistoryManager, JsonHistoryStore};
use crate::output::HistoryResult;
use anyhow::Result;
use std::path::Path;

/// History operation - returns the recorded batches, newest first
pub fn history_operation(limit: Option<usize>, working_dir: Option<&Path>) -> Result<HistoryResult> {
    let base = working_dir_or_current(working_dir)?;
    let config = Config::load_from_dir(&base)?;
    let history = HistoryManager::new(
        JsonHistoryStore::in_dir(&base.join(STATE_DIR_NAME)).with_limit(config.defaults.history_limit),
    );

    Ok(HistoryResult {
        entries: history.list(limit)?,
    })
}
