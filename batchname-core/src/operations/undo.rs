use super::working_dir_or_current;
use crate::config::{Config, STATE_DIR_NAME};
use crate::execute::ConflictPrompt;
use crate::history::{HistoryManager, JsonHistoryStore};
use crate::id_resolver::resolve_id;
use crate::lock::LockFile;
use crate::undo::UndoResult;
use crate::validate::DefaultValidator;
use anyhow::{Context, Result};
use std::path::Path;

/// High-level undo operation - equivalent to `batchname undo` command
///
/// `id` is a full operation id, a unique prefix of one, or `latest`.
pub fn undo_operation(
    id: &str,
    prompt: &mut dyn ConflictPrompt,
    working_dir: Option<&Path>,
) -> Result<UndoResult> {
    let base = working_dir_or_current(working_dir)?;
    let config = Config::load_from_dir(&base)?;
    let state_dir = base.join(STATE_DIR_NAME);

    let history = HistoryManager::new(
        JsonHistoryStore::in_dir(&state_dir).with_limit(config.defaults.history_limit),
    );
    let actual_id = resolve_id(id, &history)?;

    let lock = LockFile::acquire(&state_dir).context("Failed to acquire lock for undo operation")?;

    // The original names already existed on this filesystem
    let validator = DefaultValidator {
        allow_leading_dot: true,
        ..DefaultValidator::permissive()
    };
    let result = history.undo(&actual_id, &validator, prompt)?;

    lock.release()?;
    Ok(result)
}
