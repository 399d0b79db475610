use super::working_dir_or_current;
use crate::config::{Config, CONFIG_FILE_NAME, STATE_DIR_NAME};
use crate::history::{HistoryManager, JsonHistoryStore};
use crate::lock::is_locked;
use crate::output::{LastOperation, StatusResult};
use anyhow::Result;
use std::path::Path;

/// Status operation - returns structured data
pub fn status_operation(working_dir: Option<&Path>) -> Result<StatusResult> {
    let base = working_dir_or_current(working_dir)?;
    let state_dir = base.join(STATE_DIR_NAME);
    let config_path = state_dir.join(CONFIG_FILE_NAME);
    let config = Config::load_from_dir(&base)?;

    let history = HistoryManager::new(
        JsonHistoryStore::in_dir(&state_dir).with_limit(config.defaults.history_limit),
    );
    let entries = history.list(None)?;

    let last_operation = entries.first().map(|batch| LastOperation {
        operation_id: batch.operation_id.clone(),
        timestamp: batch.timestamp.clone(),
        file_count: batch.file_count,
        undone: batch.is_undone(),
    });

    Ok(StatusResult {
        state_dir: state_dir.display().to_string(),
        history_count: entries.len(),
        undoable_count: entries.iter().filter(|b| !b.is_undone()).count(),
        last_operation,
        locked: is_locked(&state_dir),
        config_file: config_path
            .exists()
            .then(|| config_path.display().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::ModuleChain;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_status_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let status = status_operation(Some(temp_dir.path())).unwrap();
        assert_eq!(status.history_count, 0);
        assert!(status.last_operation.is_none());
        assert!(!status.locked);
        assert!(status.config_file.is_none());
    }

    #[test]
    fn test_status_counts_undoable() {
        let temp_dir = TempDir::new().unwrap();
        let state_dir = temp_dir.path().join(STATE_DIR_NAME);
        let manager = HistoryManager::new(JsonHistoryStore::in_dir(&state_dir));
        let first = manager
            .record(&[(PathBuf::from("/d/a"), PathBuf::from("/d/b"))], &ModuleChain::default())
            .unwrap()
            .unwrap();
        let second = manager
            .record(&[(PathBuf::from("/d/c"), PathBuf::from("/d/e"))], &ModuleChain::default())
            .unwrap()
            .unwrap();
        manager.mark_undone(&first, 1).unwrap();

        let status = status_operation(Some(temp_dir.path())).unwrap();
        assert_eq!(status.history_count, 2);
        assert_eq!(status.undoable_count, 1);
        let last = status.last_operation.unwrap();
        assert_eq!(last.operation_id, second);
        assert!(!last.undone);
    }
}
