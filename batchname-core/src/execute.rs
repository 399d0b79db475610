//! Performs the renames of a batch on disk.
//!
//! Files are handled one at a time in preview order. A failure on one file is
//! recorded and the batch moves on; only a cancel from the conflict prompt (or
//! an interrupt) stops it, and nothing already renamed is rolled back.

use crate::file_record::FileRecord;
use crate::interrupt;
use crate::modules::ModuleChain;
use crate::preview::{build_preview, PreviewResult};
use crate::provider::MetadataProvider;
use crate::validate::FilenameValidator;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Answer to "the destination already exists, what now?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictAction {
    Overwrite,
    Skip,
    /// Skip this and every later conflict without asking again
    SkipAll,
    /// Stop the batch here
    Cancel,
}

impl std::str::FromStr for ConflictAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "skip" => Ok(Self::Skip),
            "skip-all" | "skip_all" => Ok(Self::SkipAll),
            "cancel" => Ok(Self::Cancel),
            _ => Err(format!("Invalid conflict action: {}", s)),
        }
    }
}

/// Decides what happens when a destination already exists.
pub trait ConflictPrompt {
    fn resolve(&mut self, target: &Path) -> ConflictAction;
}

/// Always gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPolicy(pub ConflictAction);

impl ConflictPrompt for FixedPolicy {
    fn resolve(&mut self, _target: &Path) -> ConflictAction {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Conflict,
    Unchanged,
    Cancelled,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::Unchanged => "unchanged",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeState {
    Renamed,
    Skipped(SkipReason),
    Failed(String),
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub state: OutcomeState,
}

impl RenameOutcome {
    fn new(old_path: &Path, new_path: &Path, state: OutcomeState) -> Self {
        Self {
            old_path: old_path.to_path_buf(),
            new_path: new_path.to_path_buf(),
            state,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == OutcomeState::Renamed
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self.state {
            OutcomeState::Skipped(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            OutcomeState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct OutcomeRecord<'a> {
    old_path: &'a Path,
    new_path: &'a Path,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_reason: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for RenameOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeRecord {
            old_path: &self.old_path,
            new_path: &self.new_path,
            success: self.is_success(),
            skip_reason: self.skip_reason(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

/// Outcomes of one batch, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub outcomes: Vec<RenameOutcome>,
    /// The batch was stopped before every file was handled
    pub cancelled: bool,
}

impl ExecutionReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// `(old_path, new_path)` of every successful rename
    pub fn renamed_pairs(&self) -> Vec<(PathBuf, PathBuf)> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| (o.old_path.clone(), o.new_path.clone()))
            .collect()
    }

    pub fn summary(&self) -> String {
        format!("{} of {} renamed", self.succeeded(), self.total())
    }

    /// Update the caller's records with the new names. Returns how many changed.
    pub fn apply_to(&self, records: &mut [FileRecord]) -> usize {
        let mut applied = 0;
        for record in records.iter_mut() {
            if let Some(outcome) = self
                .outcomes
                .iter()
                .find(|o| o.is_success() && o.old_path == record.full_path)
            {
                if record.apply_outcome(outcome) {
                    applied += 1;
                }
            }
        }
        applied
    }
}

/// Preview the batch, then rename every selected file.
///
/// When the preview has invalid or duplicate names nothing is touched and
/// every file gets a failed outcome.
pub fn execute(
    files: &[FileRecord],
    chain: &ModuleChain,
    provider: &dyn MetadataProvider,
    validator: &dyn FilenameValidator,
    prompt: &mut dyn ConflictPrompt,
) -> ExecutionReport {
    let preview = build_preview(files, chain, provider, validator);
    execute_preview(&preview, validator, prompt)
}

/// Rename the pairs of an already built preview.
pub fn execute_preview(
    preview: &PreviewResult,
    validator: &dyn FilenameValidator,
    prompt: &mut dyn ConflictPrompt,
) -> ExecutionReport {
    if preview.has_blocking_error {
        warn!(
            invalid = preview.counts.invalid,
            duplicate = preview.counts.duplicate,
            "preview has blocking errors, nothing renamed"
        );
        let outcomes = preview
            .pairs
            .iter()
            .map(|pair| {
                let message = match (&pair.reason, pair.status.is_blocking()) {
                    (Some(reason), _) => format!("{}: {}", pair.status.as_str(), reason),
                    (None, true) => format!("{} name", pair.status.as_str()),
                    (None, false) => "batch contains invalid or duplicate names".to_string(),
                };
                RenameOutcome::new(&pair.source, &pair.target(), OutcomeState::Failed(message))
            })
            .collect();
        return ExecutionReport {
            outcomes,
            cancelled: false,
        };
    }

    let pairs: Vec<(PathBuf, PathBuf)> = preview
        .pairs
        .iter()
        .map(|pair| (pair.source.clone(), pair.target()))
        .collect();
    execute_pairs(&pairs, validator, prompt)
}

/// Rename each `(from, to)` pair in order, resolving conflicts through `prompt`.
pub fn execute_pairs(
    pairs: &[(PathBuf, PathBuf)],
    validator: &dyn FilenameValidator,
    prompt: &mut dyn ConflictPrompt,
) -> ExecutionReport {
    info!(files = pairs.len(), "starting rename batch");

    let mut outcomes = Vec::with_capacity(pairs.len());
    let mut skip_all = false;
    let mut cancelled = false;
    let mut case_insensitive: HashMap<PathBuf, bool> = HashMap::new();

    for (from, to) in pairs {
        if !cancelled && interrupt::interrupted() {
            warn!("interrupted, remaining files are skipped");
            cancelled = true;
        }
        if cancelled {
            outcomes.push(RenameOutcome::new(from, to, OutcomeState::Skipped(SkipReason::Cancelled)));
            continue;
        }
        if from == to {
            outcomes.push(RenameOutcome::new(from, to, OutcomeState::Skipped(SkipReason::Unchanged)));
            continue;
        }

        let name = to.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if let Err(e) = validator.validate(name) {
            outcomes.push(RenameOutcome::new(
                from,
                to,
                OutcomeState::Failed(format!("invalid name: {}", e)),
            ));
            continue;
        }

        if fs::symlink_metadata(from).is_err() {
            warn!(path = %from.display(), "source file is missing");
            outcomes.push(RenameOutcome::new(
                from,
                to,
                OutcomeState::Failed(format!("source not found: {}", from.display())),
            ));
            continue;
        }

        let parent = to.parent().unwrap_or_else(|| Path::new("."));
        let case_only = is_case_only_change(from, to)
            && *case_insensitive
                .entry(parent.to_path_buf())
                .or_insert_with(|| detect_case_insensitive_fs(parent));

        if !case_only && fs::symlink_metadata(to).is_ok() {
            let action = if skip_all {
                ConflictAction::SkipAll
            } else {
                prompt.resolve(to)
            };
            debug!(destination = %to.display(), ?action, "destination exists");

            match action {
                ConflictAction::Overwrite => {},
                ConflictAction::Skip => {
                    outcomes.push(RenameOutcome::new(from, to, OutcomeState::Skipped(SkipReason::Conflict)));
                    continue;
                },
                ConflictAction::SkipAll => {
                    skip_all = true;
                    outcomes.push(RenameOutcome::new(from, to, OutcomeState::Skipped(SkipReason::Conflict)));
                    continue;
                },
                ConflictAction::Cancel => {
                    cancelled = true;
                    outcomes.push(RenameOutcome::new(from, to, OutcomeState::Skipped(SkipReason::Cancelled)));
                    continue;
                },
            }
        }

        match perform_rename(from, to, case_only) {
            Ok(()) => {
                debug!(from = %from.display(), to = %to.display(), "renamed");
                outcomes.push(RenameOutcome::new(from, to, OutcomeState::Renamed));
            },
            Err(e) => {
                warn!(from = %from.display(), to = %to.display(), error = %e, "rename failed");
                outcomes.push(RenameOutcome::new(from, to, OutcomeState::Failed(e.to_string())));
            },
        }
    }

    let report = ExecutionReport { outcomes, cancelled };
    info!(
        renamed = report.succeeded(),
        total = report.total(),
        cancelled = report.cancelled,
        "rename batch finished"
    );
    report
}

fn is_case_only_change(from: &Path, to: &Path) -> bool {
    from != to && from.to_string_lossy().to_lowercase() == to.to_string_lossy().to_lowercase()
}

fn perform_rename(from: &Path, to: &Path, two_step: bool) -> io::Result<()> {
    if !two_step {
        return fs::rename(from, to);
    }

    // Case-only change on a case-insensitive filesystem: go through a temporary sibling
    let file_name = from.file_name().and_then(|n| n.to_str()).unwrap_or("file");
    let temp = from.with_file_name(format!(".{}.batchname.{}.tmp", file_name, std::process::id()));
    fs::rename(from, &temp)?;
    if let Err(e) = fs::rename(&temp, to) {
        // Put the file back where it was
        if let Err(rollback) = fs::rename(&temp, from) {
            warn!(
                temp = %temp.display(),
                original = %from.display(),
                error = %rollback,
                "could not restore file after failed rename"
            );
            return Err(rollback_failed(&e, &temp, from, &rollback));
        }
        return Err(e);
    }
    Ok(())
}

fn rollback_failed(error: &io::Error, temp: &Path, from: &Path, rollback: &io::Error) -> io::Error {
    io::Error::new(
        error.kind(),
        format!(
            "{}; restoring {} failed: {} (file left at {})",
            error,
            from.display(),
            rollback,
            temp.display()
        ),
    )
}

/// Detect if the filesystem holding `path` is case-insensitive
pub fn detect_case_insensitive_fs(path: &Path) -> bool {
    let temp_dir = match TempDir::new_in(path) {
        Ok(dir) => dir,
        Err(_) => return false, // Assume case-sensitive if we can't test
    };

    let test_file_lower = temp_dir.path().join("case_check_a");
    let test_file_upper = temp_dir.path().join("case_check_A");

    if fs::write(&test_file_lower, b"case").is_err() {
        return false;
    }

    fs::metadata(&test_file_upper).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::DefaultValidator;
    use tempfile::TempDir;

    struct Scripted {
        answers: Vec<ConflictAction>,
        asked: Vec<PathBuf>,
    }

    impl ConflictPrompt for Scripted {
        fn resolve(&mut self, target: &Path) -> ConflictAction {
            self.asked.push(target.to_path_buf());
            if self.answers.is_empty() {
                ConflictAction::Skip
            } else {
                self.answers.remove(0)
            }
        }
    }

    fn setup(names: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for name in names {
            fs::write(temp_dir.path().join(name), name).unwrap();
        }
        temp_dir
    }

    fn pair(dir: &Path, from: &str, to: &str) -> (PathBuf, PathBuf) {
        (dir.join(from), dir.join(to))
    }

    #[test]
    fn test_simple_renames() {
        let temp_dir = setup(&["a.txt", "b.txt"]);
        let dir = temp_dir.path();
        let pairs = vec![pair(dir, "a.txt", "1.txt"), pair(dir, "b.txt", "2.txt")];

        let report = execute_pairs(&pairs, &DefaultValidator::default(), &mut FixedPolicy(ConflictAction::Cancel));
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.summary(), "2 of 2 renamed");
        assert!(!report.cancelled);
        assert_eq!(fs::read_to_string(dir.join("1.txt")).unwrap(), "a.txt");
        assert!(!dir.join("a.txt").exists());
    }

    #[test]
    fn test_unchanged_is_skipped() {
        let temp_dir = setup(&["a.txt"]);
        let pairs = vec![pair(temp_dir.path(), "a.txt", "a.txt")];
        let report = execute_pairs(&pairs, &DefaultValidator::default(), &mut FixedPolicy(ConflictAction::Cancel));
        assert_eq!(report.outcomes[0].skip_reason(), Some(SkipReason::Unchanged));
    }

    #[test]
    fn test_missing_source_does_not_stop_batch() {
        let temp_dir = setup(&["b.txt"]);
        let dir = temp_dir.path();
        let pairs = vec![pair(dir, "gone.txt", "x.txt"), pair(dir, "b.txt", "y.txt")];

        let report = execute_pairs(&pairs, &DefaultValidator::default(), &mut FixedPolicy(ConflictAction::Skip));
        assert!(report.outcomes[0].error().unwrap().contains("source not found"));
        assert!(report.outcomes[1].is_success());
        assert_eq!(report.summary(), "1 of 2 renamed");
    }

    #[test]
    fn test_failed_rename_does_not_stop_batch() {
        let temp_dir = setup(&["a.txt", "b.txt"]);
        let dir = temp_dir.path();
        fs::create_dir(dir.join("1.txt")).unwrap();
        fs::write(dir.join("1.txt").join("inner"), "keep").unwrap();
        let pairs = vec![pair(dir, "a.txt", "1.txt"), pair(dir, "b.txt", "2.txt")];

        let report = execute_pairs(&pairs, &DefaultValidator::default(), &mut FixedPolicy(ConflictAction::Overwrite));

        match &report.outcomes[0].state {
            OutcomeState::Failed(message) => assert!(!message.is_empty()),
            other => panic!("expected a failure, got {:?}", other),
        }
        assert_eq!(report.outcomes[1].state, OutcomeState::Renamed);
        assert!(!report.cancelled);
        assert_eq!(fs::read_to_string(dir.join("a.txt")).unwrap(), "a.txt");
        assert_eq!(fs::read_to_string(dir.join("1.txt").join("inner")).unwrap(), "keep");
        assert!(dir.join("2.txt").exists());
    }

    #[test]
    fn test_two_step_rename_puts_file_back_on_failure() {
        let temp_dir = setup(&["a.txt"]);
        let dir = temp_dir.path();
        fs::create_dir(dir.join("b.txt")).unwrap();
        fs::write(dir.join("b.txt").join("inner"), "keep").unwrap();

        assert!(perform_rename(&dir.join("a.txt"), &dir.join("b.txt"), true).is_err());
        assert_eq!(fs::read_to_string(dir.join("a.txt")).unwrap(), "a.txt");
        let leftovers: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "{:?}", leftovers);
    }

    #[test]
    fn test_rollback_failure_is_reported() {
        let error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let rollback = io::Error::new(io::ErrorKind::NotFound, "gone");
        let combined = rollback_failed(&error, Path::new("/d/.a.tmp"), Path::new("/d/a.txt"), &rollback);

        assert_eq!(combined.kind(), io::ErrorKind::PermissionDenied);
        let message = combined.to_string();
        assert!(message.starts_with("denied; restoring /d/a.txt failed: gone"));
        assert!(message.contains("file left at /d/.a.tmp"));
    }

    #[test]
    fn test_invalid_destination_fails() {
        let temp_dir = setup(&["a.txt"]);
        let pairs = vec![pair(temp_dir.path(), "a.txt", "CON.txt")];
        let report = execute_pairs(&pairs, &DefaultValidator::default(), &mut FixedPolicy(ConflictAction::Skip));
        assert!(report.outcomes[0].error().unwrap().starts_with("invalid name"));
        assert!(temp_dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_skip_all_stops_asking() {
        let temp_dir = setup(&["1", "2", "3", "4", "5", "t1", "t2", "t3", "t4", "t5"]);
        let dir = temp_dir.path();
        let pairs: Vec<_> = (1..=5)
            .map(|i| pair(dir, &i.to_string(), &format!("t{}", i)))
            .collect();
        let mut prompt = Scripted {
            answers: vec![ConflictAction::Overwrite, ConflictAction::Skip, ConflictAction::SkipAll],
            asked: Vec::new(),
        };

        let report = execute_pairs(&pairs, &DefaultValidator::default(), &mut prompt);
        assert_eq!(prompt.asked.len(), 3);
        assert!(report.outcomes[0].is_success());
        for outcome in &report.outcomes[1..] {
            assert_eq!(outcome.skip_reason(), Some(SkipReason::Conflict));
        }
        assert_eq!(fs::read_to_string(dir.join("t1")).unwrap(), "1");
        assert_eq!(fs::read_to_string(dir.join("t4")).unwrap(), "t4");
    }

    #[test]
    fn test_cancel_keeps_earlier_renames() {
        let temp_dir = setup(&["a", "b", "c", "taken"]);
        let dir = temp_dir.path();
        let pairs = vec![
            pair(dir, "a", "a1"),
            pair(dir, "b", "taken"),
            pair(dir, "c", "c1"),
        ];

        let report = execute_pairs(&pairs, &DefaultValidator::default(), &mut FixedPolicy(ConflictAction::Cancel));
        assert!(report.cancelled);
        assert!(report.outcomes[0].is_success());
        assert_eq!(report.outcomes[1].skip_reason(), Some(SkipReason::Cancelled));
        assert_eq!(report.outcomes[2].skip_reason(), Some(SkipReason::Cancelled));
        assert!(dir.join("a1").exists());
        assert!(dir.join("c").exists());
    }

    #[test]
    fn test_outcome_serialization() {
        let renamed = RenameOutcome::new(Path::new("/d/a"), Path::new("/d/b"), OutcomeState::Renamed);
        let json = serde_json::to_value(&renamed).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("skip_reason").is_none());
        assert!(json.get("error").is_none());

        let skipped = RenameOutcome::new(
            Path::new("/d/a"),
            Path::new("/d/b"),
            OutcomeState::Skipped(SkipReason::Conflict),
        );
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["skip_reason"], "conflict");

        let failed = RenameOutcome::new(Path::new("/d/a"), Path::new("/d/b"), OutcomeState::Failed("boom".into()));
        assert_eq!(serde_json::to_value(&failed).unwrap()["error"], "boom");
    }

    #[test]
    fn test_apply_to_records() {
        let temp_dir = setup(&["a.txt", "b.txt"]);
        let dir = temp_dir.path();
        let mut records = vec![
            FileRecord::from_path(dir.join("a.txt")).unwrap(),
            FileRecord::from_path(dir.join("b.txt")).unwrap(),
        ];
        let pairs = vec![pair(dir, "a.txt", "z.md"), pair(dir, "missing", "q")];

        let report = execute_pairs(&pairs, &DefaultValidator::default(), &mut FixedPolicy(ConflictAction::Skip));
        assert_eq!(report.apply_to(&mut records), 1);
        assert_eq!(records[0].current_name, "z.md");
        assert_eq!(records[0].extension, "md");
        assert_eq!(records[1].current_name, "b.txt");
    }

    #[test]
    fn test_conflict_action_from_str() {
        assert_eq!("skip-all".parse::<ConflictAction>(), Ok(ConflictAction::SkipAll));
        assert_eq!("Overwrite".parse::<ConflictAction>(), Ok(ConflictAction::Overwrite));
        assert!("maybe".parse::<ConflictAction>().is_err());
    }
}
