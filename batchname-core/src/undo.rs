use crate::execute::{detect_case_insensitive_fs, execute_pairs, ConflictPrompt, RenameOutcome};
use crate::history::{find_in, HistoryManager, HistoryStore, RenameBatch};
use crate::validate::FilenameValidator;
use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Whether a batch can be reversed right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UndoCheck {
    pub undoable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl UndoCheck {
    fn ok() -> Self {
        Self {
            undoable: true,
            reason: None,
        }
    }

    fn refuse(reason: String) -> Self {
        Self {
            undoable: false,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UndoResult {
    pub operation_id: String,
    /// Every pair of the batch was restored
    pub success: bool,
    pub message: String,
    pub restored: usize,
    pub outcomes: Vec<RenameOutcome>,
}

// A case-only rename on a case-insensitive filesystem leaves both names
// pointing at the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    if a.to_string_lossy().to_lowercase() != b.to_string_lossy().to_lowercase() {
        return false;
    }
    detect_case_insensitive_fs(a.parent().unwrap_or_else(|| Path::new(".")))
}

fn check_batch(batch: &RenameBatch) -> UndoCheck {
    if let Some(undone_at) = &batch.undone_at {
        return UndoCheck::refuse(format!(
            "Operation {} was already undone at {}",
            batch.operation_id, undone_at
        ));
    }

    for pair in &batch.renames {
        if fs::symlink_metadata(&pair.new_path).is_err() {
            return UndoCheck::refuse(format!(
                "{} no longer exists (renamed or deleted since)",
                pair.new_path.display()
            ));
        }
        if fs::symlink_metadata(&pair.old_path).is_ok() && !same_file(&pair.old_path, &pair.new_path) {
            return UndoCheck::refuse(format!(
                "{} is now occupied by another file",
                pair.old_path.display()
            ));
        }
    }

    UndoCheck::ok()
}

impl<S: HistoryStore> HistoryManager<S> {
    /// Check that every renamed file is still where the batch left it and
    /// that none of the original names has been taken since.
    pub fn can_undo(&self, id: &str) -> Result<UndoCheck> {
        let batches = self.store()?.load()?;
        Ok(match find_in(&batches, id) {
            Some(batch) => check_batch(batch),
            None => UndoCheck::refuse(format!("Unknown operation id: {}", id)),
        })
    }

    /// Reverse a batch, restoring files in their original order.
    ///
    /// The batch is marked undone as soon as at least one file was restored,
    /// so a partial undo cannot be repeated.
    pub fn undo(
        &self,
        id: &str,
        validator: &dyn FilenameValidator,
        prompt: &mut dyn ConflictPrompt,
    ) -> Result<UndoResult> {
        // Check, restore and mark as one step
        let _writer = self.writer()?;
        let batch = {
            let batches = self.store()?.load()?;
            find_in(&batches, id).cloned()
        };
        let Some(batch) = batch else {
            return Ok(UndoResult {
                operation_id: id.to_string(),
                success: false,
                message: format!("Unknown operation id: {}", id),
                restored: 0,
                outcomes: Vec::new(),
            });
        };

        let check = check_batch(&batch);
        if !check.undoable {
            let message = check.reason.unwrap_or_default();
            warn!(operation_id = %batch.operation_id, reason = %message, "batch cannot be undone");
            return Ok(UndoResult {
                operation_id: batch.operation_id,
                success: false,
                message,
                restored: 0,
                outcomes: Vec::new(),
            });
        }

        let pairs: Vec<(PathBuf, PathBuf)> = batch
            .renames
            .iter()
            .map(|p| (p.new_path.clone(), p.old_path.clone()))
            .collect();
        let report = execute_pairs(&pairs, validator, prompt);
        let restored = report.succeeded();

        if restored > 0 {
            self.mark_undone(&batch.operation_id, restored)?;
        }

        let total = pairs.len();
        let success = restored == total;
        let message = if success {
            format!("Restored {} files from operation {}", restored, batch.operation_id)
        } else {
            let first_problem = report
                .outcomes
                .iter()
                .find(|o| !o.is_success())
                .map(|o| match (o.error(), o.skip_reason()) {
                    (Some(error), _) => format!("{}: {}", o.old_path.display(), error),
                    (None, Some(reason)) => format!("{}: {}", o.old_path.display(), reason.as_str()),
                    (None, None) => o.old_path.display().to_string(),
                })
                .unwrap_or_default();
            format!(
                "Restored {} of {} files from operation {} ({})",
                restored, total, batch.operation_id, first_problem
            )
        };
        info!(operation_id = %batch.operation_id, restored, total, "undo finished");

        Ok(UndoResult {
            operation_id: batch.operation_id,
            success,
            message,
            restored,
            outcomes: report.outcomes,
        })
    }
}
