use crate::modules::ModuleChain;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const HISTORY_FILE_NAME: &str = "history.json";

/// One successful rename inside a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePair {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
}

/// A recorded rename batch, the unit of undo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameBatch {
    /// 16 hex characters
    pub operation_id: String,
    /// RFC 3339
    pub timestamp: String,
    pub file_count: usize,
    /// Successful renames only, in execution order
    pub renames: Vec<RenamePair>,
    #[serde(default)]
    pub modules_data: serde_json::Value,
    #[serde(default)]
    pub post_transform_data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undone_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restored_count: Option<usize>,
}

impl RenameBatch {
    pub fn is_undone(&self) -> bool {
        self.undone_at.is_some()
    }

    /// Module type tags of the recorded chain, for display
    pub fn chain_description(&self) -> String {
        let types: Vec<&str> = self
            .modules_data
            .as_array()
            .map(|modules| {
                modules
                    .iter()
                    .filter_map(|m| m.get("type").and_then(serde_json::Value::as_str))
                    .collect()
            })
            .unwrap_or_default();
        if types.is_empty() {
            "-".to_string()
        } else {
            types.join(" + ")
        }
    }
}

/// Durable storage for rename batches, oldest first.
pub trait HistoryStore {
    fn load(&self) -> Result<Vec<RenameBatch>>;
    fn save(&mut self, batches: &[RenameBatch]) -> Result<()>;
}

fn prune(batches: &[RenameBatch], limit: Option<usize>) -> &[RenameBatch] {
    match limit {
        Some(limit) if batches.len() > limit => &batches[batches.len() - limit..],
        _ => batches,
    }
}

/// Batches kept in a JSON file, normally `.batchname/history.json`.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
    limit: Option<usize>,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            limit: None,
        }
    }

    /// Store inside a state directory
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(HISTORY_FILE_NAME))
    }

    /// Keep at most `limit` batches, dropping the oldest
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<Vec<RenameBatch>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open history file: {}", self.path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse history file: {}", self.path.display()))
    }

    fn save(&mut self, batches: &[RenameBatch]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // Write next to the target and move into place so readers never see half a file
        let temp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create history file in {}", parent.display()))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, prune(batches, self.limit))
                .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;
            writer.flush()?;
        }
        temp.persist(&self.path)
            .with_context(|| format!("Failed to replace history file: {}", self.path.display()))?;
        Ok(())
    }
}

/// History kept in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    batches: Vec<RenameBatch>,
    limit: Option<usize>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<Vec<RenameBatch>> {
        Ok(self.batches.clone())
    }

    fn save(&mut self, batches: &[RenameBatch]) -> Result<()> {
        self.batches = prune(batches, self.limit).to_vec();
        Ok(())
    }
}

/// Records batches and finds them again. Undo lives in [`crate::undo`].
#[derive(Debug)]
pub struct HistoryManager<S: HistoryStore> {
    store: Mutex<S>,
    // Held for a whole record or undo, so an undo cannot interleave with another
    writer: Mutex<()>,
}

impl<S: HistoryStore> HistoryManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
            writer: Mutex::new(()),
        }
    }

    pub(crate) fn store(&self) -> Result<MutexGuard<'_, S>> {
        self.store
            .lock()
            .map_err(|_| anyhow!("History store lock was poisoned"))
    }

    /// Exclusive access for a multi-step change; take it before `store()`
    pub(crate) fn writer(&self) -> Result<MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|_| anyhow!("History writer lock was poisoned"))
    }

    /// Record the successful renames of a batch.
    ///
    /// Returns the new operation id, or `None` (writing nothing) when there
    /// were no successes.
    pub fn record(&self, renames: &[(PathBuf, PathBuf)], chain: &ModuleChain) -> Result<Option<String>> {
        if renames.is_empty() {
            info!("no files were renamed, nothing recorded");
            return Ok(None);
        }

        let _writer = self.writer()?;
        let mut store = self.store()?;
        let mut batches = store.load()?;

        let timestamp = chrono::Local::now();
        let operation_id = generate_operation_id(renames, &timestamp);
        if batches.iter().any(|b| b.operation_id == operation_id) {
            return Err(anyhow!("History entry with ID {} already exists", operation_id));
        }

        batches.push(RenameBatch {
            operation_id: operation_id.clone(),
            timestamp: timestamp.to_rfc3339(),
            file_count: renames.len(),
            renames: renames
                .iter()
                .map(|(old_path, new_path)| RenamePair {
                    old_path: old_path.clone(),
                    new_path: new_path.clone(),
                })
                .collect(),
            modules_data: serde_json::to_value(&chain.modules)?,
            post_transform_data: serde_json::to_value(chain.post_transform)?,
            undone_at: None,
            restored_count: None,
        });
        store.save(&batches)?;

        info!(operation_id = %operation_id, files = renames.len(), "recorded rename batch");
        Ok(Some(operation_id))
    }

    /// Batches newest first, optionally only the `limit` most recent
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<RenameBatch>> {
        let batches = self.store()?.load()?;
        Ok(batches
            .into_iter()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }

    /// Find a batch by id or by an unambiguous id prefix
    pub fn find(&self, id: &str) -> Result<Option<RenameBatch>> {
        let batches = self.store()?.load()?;
        Ok(find_in(&batches, id).cloned())
    }

    /// The newest batch that has not been undone
    pub fn latest_undoable(&self) -> Result<Option<RenameBatch>> {
        let batches = self.store()?.load()?;
        Ok(batches.into_iter().rev().find(|b| !b.is_undone()))
    }

    /// Callers changing files first must hold `writer()` across both steps.
    pub(crate) fn mark_undone(&self, id: &str, restored: usize) -> Result<()> {
        let mut store = self.store()?;
        let mut batches = store.load()?;
        let batch = batches
            .iter_mut()
            .find(|b| b.operation_id == id)
            .ok_or_else(|| anyhow!("Operation {} not found in history", id))?;
        if let Some(undone_at) = &batch.undone_at {
            return Err(anyhow!("Operation {} was already undone at {}", id, undone_at));
        }
        batch.undone_at = Some(chrono::Local::now().to_rfc3339());
        batch.restored_count = Some(restored);
        store.save(&batches)?;
        debug!(operation_id = %id, restored, "marked batch undone");
        Ok(())
    }
}

pub(crate) fn find_in<'a>(batches: &'a [RenameBatch], id: &str) -> Option<&'a RenameBatch> {
    if let Some(batch) = batches.iter().find(|b| b.operation_id == id) {
        return Some(batch);
    }
    if id.len() < 4 {
        return None;
    }
    let mut matches = batches.iter().filter(|b| b.operation_id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(batch), None) => Some(batch),
        _ => None,
    }
}

/// Operation id: first 16 hex characters of a SHA-256 over the renames and time
fn generate_operation_id(renames: &[(PathBuf, PathBuf)], timestamp: &chrono::DateTime<chrono::Local>) -> String {
    let mut hasher = Sha256::new();
    for (old_path, new_path) in renames {
        hasher.update(old_path.to_string_lossy().as_bytes());
        hasher.update([0]);
        hasher.update(new_path.to_string_lossy().as_bytes());
        hasher.update([0]);
    }
    hasher.update(timestamp.to_rfc3339().as_bytes());
    hasher.update(
        timestamp
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_le_bytes(),
    );
    hasher.update(std::process::id().to_le_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}

/// Format batches as a table for display
pub fn format_history(batches: &[RenameBatch], use_color: bool) -> String {
    use comfy_table::{Cell, Color, Table};

    let mut table = Table::new();
    if use_color {
        table.enforce_styling();
    }
    let header = ["ID", "Date", "Files", "Chain", "Status"];
    if use_color {
        table.set_header(header.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
    } else {
        table.set_header(header);
    }

    for batch in batches {
        let date = batch
            .timestamp
            .split('T')
            .next()
            .unwrap_or(&batch.timestamp);
        let status = match (batch.is_undone(), batch.restored_count) {
            (true, Some(restored)) if restored < batch.file_count => {
                format!("undone ({} of {})", restored, batch.file_count)
            },
            (true, _) => "undone".to_string(),
            (false, _) => "active".to_string(),
        };
        let status_cell = if use_color {
            let color = if batch.is_undone() { Color::DarkGrey } else { Color::Green };
            Cell::new(status).fg(color)
        } else {
            Cell::new(status)
        };

        table.add_row(vec![
            Cell::new(&batch.operation_id),
            Cell::new(date),
            Cell::new(batch.file_count),
            Cell::new(batch.chain_description()),
            status_cell,
        ]);
    }

    table.to_string()
}
