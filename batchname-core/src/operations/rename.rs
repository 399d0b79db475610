use super::{preview_request, working_dir_or_current, BatchRequest};
use crate::config::{Config, STATE_DIR_NAME};
use crate::execute::{execute_preview, ConflictPrompt};
use crate::history::{HistoryManager, JsonHistoryStore};
use crate::lock::LockFile;
use crate::output::RenameResult;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Rename operation - previews, renames and records the batch in history.
///
/// With `dry_run` only the preview is computed. A preview with invalid or
/// duplicate names renames nothing and takes no lock.
pub fn rename_operation(
    request: &BatchRequest,
    prompt: &mut dyn ConflictPrompt,
    dry_run: bool,
    working_dir: Option<&Path>,
) -> Result<RenameResult> {
    let base = working_dir_or_current(working_dir)?;
    let config = Config::load_from_dir(&base)?;
    let validator = config.validator();
    let preview = preview_request(request, &base, &config)?;

    if dry_run {
        return Ok(RenameResult {
            operation_id: None,
            dry_run,
            preview,
            report: None,
        });
    }

    if preview.has_blocking_error {
        let report = execute_preview(&preview, &validator, prompt);
        return Ok(RenameResult {
            operation_id: None,
            dry_run,
            preview,
            report: Some(report),
        });
    }

    let state_dir = base.join(STATE_DIR_NAME);
    let lock = LockFile::acquire(&state_dir).context("Failed to acquire lock for rename operation")?;

    let report = execute_preview(&preview, &validator, prompt);

    let history = HistoryManager::new(
        JsonHistoryStore::in_dir(&state_dir).with_limit(config.defaults.history_limit),
    );
    let operation_id = history
        .record(&report.renamed_pairs(), &request.chain)
        .context("Failed to record rename history")?;

    lock.release()?;

    info!(
        renamed = report.succeeded(),
        total = report.total(),
        cancelled = report.cancelled,
        "rename operation finished"
    );

    Ok(RenameResult {
        operation_id,
        dry_run,
        preview,
        report: Some(report),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execute::{ConflictAction, FixedPolicy};
    use crate::file_record::ScanOptions;
    use crate::history::HistoryStore;
    use crate::modules::{ModuleChain, ModuleSpec};
    use std::fs;
    use tempfile::TempDir;

    fn setup(names: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for name in names {
            fs::write(temp_dir.path().join(name), name).unwrap();
        }
        temp_dir
    }

    fn numbered() -> BatchRequest {
        BatchRequest {
            chain: ModuleChain::new(vec![ModuleSpec::literal("file_"), ModuleSpec::counter(1, 1, 0)]),
            ..BatchRequest::default()
        }
    }

    #[test]
    fn test_rename_operation_records_history() {
        let temp_dir = setup(&["a.txt", "b.txt"]);
        let dir = temp_dir.path();

        let result =
            rename_operation(&numbered(), &mut FixedPolicy(ConflictAction::Cancel), false, Some(dir)).unwrap();

        assert!(result.is_complete());
        assert_eq!(result.renamed(), 2);
        assert_eq!(fs::read_to_string(dir.join("file_1.txt")).unwrap(), "a.txt");
        assert_eq!(fs::read_to_string(dir.join("file_2.txt")).unwrap(), "b.txt");

        let id = result.operation_id.unwrap();
        let batches = JsonHistoryStore::in_dir(&dir.join(STATE_DIR_NAME)).load().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].operation_id, id);
        assert!(!dir.join(STATE_DIR_NAME).join(crate::lock::LOCK_FILE_NAME).exists());
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let temp_dir = setup(&["a.txt"]);
        let dir = temp_dir.path();

        let result =
            rename_operation(&numbered(), &mut FixedPolicy(ConflictAction::Cancel), true, Some(dir)).unwrap();
        assert!(result.dry_run);
        assert!(result.report.is_none());
        assert!(dir.join("a.txt").exists());
        assert!(!dir.join(STATE_DIR_NAME).exists());
    }

    #[test]
    fn test_blocked_batch_records_nothing() {
        let temp_dir = setup(&["a.txt", "b.txt"]);
        let dir = temp_dir.path();
        let request = BatchRequest {
            chain: ModuleChain::new(vec![ModuleSpec::literal("same")]),
            ..BatchRequest::default()
        };

        let result = rename_operation(&request, &mut FixedPolicy(ConflictAction::Cancel), false, Some(dir)).unwrap();
        assert!(result.blocked());
        assert_eq!(result.renamed(), 0);
        assert!(result.operation_id.is_none());
        assert!(dir.join("a.txt").exists());
        assert!(!dir.join(STATE_DIR_NAME).exists());
    }

    #[test]
    fn test_all_skipped_records_nothing() {
        let temp_dir = setup(&["a.txt", "file_1.txt"]);
        let dir = temp_dir.path();
        let request = BatchRequest {
            paths: vec!["a.txt".into()],
            ..numbered()
        };

        let result = rename_operation(&request, &mut FixedPolicy(ConflictAction::Skip), false, Some(dir)).unwrap();
        assert_eq!(result.renamed(), 0);
        assert!(result.operation_id.is_none());
        assert!(JsonHistoryStore::in_dir(&dir.join(STATE_DIR_NAME)).load().unwrap().is_empty());
    }

    #[test]
    fn test_recursive_hidden_scan_leaves_state_dir_alone() {
        let temp_dir = setup(&["a.txt", "b.txt"]);
        let dir = temp_dir.path();
        let mut prompt = FixedPolicy(ConflictAction::Cancel);
        rename_operation(&numbered(), &mut prompt, false, Some(dir)).unwrap();
        let state_dir = dir.join(STATE_DIR_NAME);
        assert_eq!(JsonHistoryStore::in_dir(&state_dir).load().unwrap().len(), 1);

        let request = BatchRequest {
            scan: ScanOptions {
                recursive: true,
                hidden: true,
                ..ScanOptions::default()
            },
            chain: ModuleChain::new(vec![ModuleSpec::literal("f_"), ModuleSpec::counter(1, 1, 0)]),
            ..BatchRequest::default()
        };
        let result = rename_operation(&request, &mut prompt, false, Some(dir)).unwrap();

        let report = result.report.unwrap();
        assert_eq!(report.succeeded(), 2);
        assert!(report.outcomes.iter().all(|o| !o.old_path.starts_with(&state_dir)));
        assert!(dir.join("f_1.txt").exists());
        assert_eq!(JsonHistoryStore::in_dir(&state_dir).load().unwrap().len(), 2);
    }
}
