use crate::execute::{ExecutionReport, SkipReason};
use crate::history::{format_history, RenameBatch};
use crate::preview::{render_summary, PreviewResult};
use crate::undo::UndoResult;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// Result of a preview operation
#[derive(Debug, Clone, Serialize)]
pub struct PreviewOutput {
    pub preview: PreviewResult,
}

/// Result of a rename operation
#[derive(Debug, Clone, Serialize)]
pub struct RenameResult {
    /// Id of the recorded history entry, if anything was renamed
    pub operation_id: Option<String>,
    pub dry_run: bool,
    pub preview: PreviewResult,
    /// `None` for a dry run
    pub report: Option<ExecutionReport>,
}

impl RenameResult {
    pub fn renamed(&self) -> usize {
        self.report.as_ref().map_or(0, ExecutionReport::succeeded)
    }

    pub fn total(&self) -> usize {
        self.report
            .as_ref()
            .map_or_else(|| self.preview.pairs.len(), ExecutionReport::total)
    }

    /// Nothing ran because the preview had invalid or duplicate names
    pub fn blocked(&self) -> bool {
        !self.dry_run && self.preview.has_blocking_error
    }

    /// Every file that was supposed to change did change
    pub fn is_complete(&self) -> bool {
        match &self.report {
            None => !self.preview.has_blocking_error,
            Some(report) => {
                !report.cancelled
                    && !self.preview.has_blocking_error
                    && report
                        .outcomes
                        .iter()
                        .all(|o| o.is_success() || o.skip_reason() == Some(SkipReason::Unchanged))
            },
        }
    }
}

/// Result of a status operation
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResult {
    pub state_dir: String,
    pub history_count: usize,
    pub undoable_count: usize,
    pub last_operation: Option<LastOperation>,
    /// Another process currently holds the lock
    pub locked: bool,
    pub config_file: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LastOperation {
    pub operation_id: String,
    pub timestamp: String,
    pub file_count: usize,
    pub undone: bool,
}

/// Result of a history operation
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResult {
    pub entries: Vec<RenameBatch>,
}

/// Result of a version command
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResult {
    pub name: String,
    pub version: String,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

impl OutputFormatter for PreviewOutput {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": !self.preview.has_blocking_error,
            "operation": "preview",
            "summary": self.preview.counts,
            "pairs": self.preview.pairs,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        render_summary(&self.preview)
    }
}

impl OutputFormatter for RenameResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.is_complete(),
            "operation": "rename",
            "dry_run": self.dry_run,
            "operation_id": self.operation_id,
            "summary": {
                "renamed": self.renamed(),
                "total": self.total(),
                "cancelled": self.report.as_ref().is_some_and(|r| r.cancelled),
            },
            "preview": self.preview.counts,
            "outcomes": self.report.as_ref().map(|r| &r.outcomes),
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        if self.dry_run {
            writeln!(
                output,
                "Dry run: {} of {} files would be renamed",
                self.preview.counts.valid,
                self.preview.counts.total()
            )
            .unwrap();
            if self.preview.has_blocking_error {
                writeln!(
                    output,
                    "✗ {} invalid and {} duplicate names would block the batch",
                    self.preview.counts.invalid, self.preview.counts.duplicate
                )
                .unwrap();
            }
            return output;
        }

        if self.blocked() {
            writeln!(
                output,
                "✗ Nothing renamed: {} invalid and {} duplicate names",
                self.preview.counts.invalid, self.preview.counts.duplicate
            )
            .unwrap();
            for pair in self.preview.pairs.iter().filter(|p| p.status.is_blocking()) {
                write!(output, "  {} -> {}: {}", pair.old_name, pair.new_name, pair.status.as_str()).unwrap();
                if let Some(reason) = &pair.reason {
                    write!(output, " ({})", reason).unwrap();
                }
                writeln!(output).unwrap();
            }
            return output;
        }

        let Some(report) = &self.report else {
            return output;
        };

        if report.succeeded() == 0 {
            output.push_str("No files were renamed\n");
        } else if self.is_complete() {
            writeln!(output, "✓ {}", report.summary()).unwrap();
        } else {
            writeln!(output, "{}", report.summary()).unwrap();
        }

        for outcome in report.outcomes.iter().filter(|o| !o.is_success()) {
            let name = outcome
                .old_path
                .file_name()
                .map_or_else(|| outcome.old_path.display().to_string(), |n| n.to_string_lossy().into_owned());
            if let Some(error) = outcome.error() {
                writeln!(output, "  failed  {}: {}", name, error).unwrap();
            } else if let Some(reason) = outcome.skip_reason() {
                if reason != SkipReason::Unchanged {
                    writeln!(output, "  skipped {}: {}", name, reason.as_str()).unwrap();
                }
            }
        }

        if report.cancelled {
            output.push_str("Batch cancelled, earlier renames were kept\n");
        }

        if let Some(id) = &self.operation_id {
            writeln!(output, "Undo with: batchname undo {}", id).unwrap();
        }

        output
    }
}

impl OutputFormatter for UndoResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.success,
            "operation": "undo",
            "operation_id": self.operation_id,
            "message": self.message,
            "summary": {
                "restored": self.restored,
                "total": self.outcomes.len(),
            },
            "outcomes": self.outcomes,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();
        if self.success {
            writeln!(output, "✓ {}", self.message).unwrap();
        } else {
            writeln!(output, "✗ {}", self.message).unwrap();
        }
        for outcome in self.outcomes.iter().filter(|o| !o.is_success()) {
            match (outcome.error(), outcome.skip_reason()) {
                (Some(error), _) => {
                    writeln!(output, "  failed  {}: {}", outcome.old_path.display(), error).unwrap();
                },
                (None, Some(reason)) => {
                    writeln!(output, "  skipped {}: {}", outcome.old_path.display(), reason.as_str()).unwrap();
                },
                (None, None) => {},
            }
        }
        output
    }
}

impl OutputFormatter for StatusResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&self).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        writeln!(output, "State directory: {}", self.state_dir).unwrap();
        if let Some(ref config_file) = self.config_file {
            writeln!(output, "Config: {}", config_file).unwrap();
        } else {
            output.push_str("Config: defaults\n");
        }
        writeln!(
            output,
            "History entries: {} ({} undoable)",
            self.history_count, self.undoable_count
        )
        .unwrap();

        if let Some(ref last) = self.last_operation {
            write!(
                output,
                "Last operation: {} ({} files, {})",
                last.operation_id, last.file_count, last.timestamp
            )
            .unwrap();
            if last.undone {
                output.push_str(" [UNDONE]");
            }
            output.push('\n');
        }

        if self.locked {
            output.push_str("Another batchname process holds the lock\n");
        }

        output
    }
}

impl OutputFormatter for HistoryResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "entries": self.entries
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if self.entries.is_empty() {
            return "No history entries found".to_string();
        }
        format_history(&self.entries, false)
    }
}

impl OutputFormatter for VersionResult {
    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}
