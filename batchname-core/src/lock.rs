use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

pub const LOCK_FILE_NAME: &str = "batchname.lock";
const STALE_LOCK_TIMEOUT_SECS: u64 = 300;

/// Process lock held while a batch or an undo writes to the state directory.
///
/// The file holds `pid:timestamp`. A lock older than five minutes, or one whose
/// process is gone, is taken over.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    pid: u32,
    timestamp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn parse_lock(content: &str) -> Option<(u32, u64)> {
    let (pid, timestamp) = content.trim().split_once(':')?;
    Some((pid.parse().ok()?, timestamp.parse().ok()?))
}

impl LockFile {
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        let lock_path = state_dir.join(LOCK_FILE_NAME);

        if lock_path.exists() {
            let content = fs::read_to_string(&lock_path).context("Failed to read lock file")?;
            match parse_lock(&content) {
                Some((pid, timestamp)) => {
                    let age = now_secs().saturating_sub(timestamp);
                    if age <= STALE_LOCK_TIMEOUT_SECS && is_process_running(pid) {
                        return Err(anyhow!(
                            "Another batchname process is already running (PID: {}). \
                            If this is incorrect, remove the lock file at: {}",
                            pid,
                            lock_path.display()
                        ));
                    }
                    debug!(pid, age, "taking over abandoned lock");
                },
                None => warn!(path = %lock_path.display(), "removing unreadable lock file"),
            }
            fs::remove_file(&lock_path).context("Failed to remove stale lock file")?;
        }

        fs::create_dir_all(state_dir).context("Failed to create state directory")?;

        let pid = process::id();
        let timestamp = now_secs();
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .context("Failed to create lock file")?;
        file.write_all(format!("{}:{}", pid, timestamp).as_bytes())
            .context("Failed to write lock file")?;

        Ok(Self {
            path: lock_path,
            pid,
            timestamp,
        })
    }

    /// Release the lock, leaving a lock that belongs to someone else alone
    pub fn release(self) -> Result<()> {
        if let Ok(content) = fs::read_to_string(&self.path) {
            if parse_lock(&content) == Some((self.pid, self.timestamp)) {
                fs::remove_file(&self.path).context("Failed to remove lock file")?;
            }
        }
        Ok(())
    }
}

/// A live lock is held on `state_dir` by some process
pub fn is_locked(state_dir: &Path) -> bool {
    let Ok(content) = fs::read_to_string(state_dir.join(LOCK_FILE_NAME)) else {
        return false;
    };
    parse_lock(&content).is_some_and(|(pid, timestamp)| {
        now_secs().saturating_sub(timestamp) <= STALE_LOCK_TIMEOUT_SECS && is_process_running(pid)
    })
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    // Signal 0 only checks that the process exists
    #[allow(clippy::cast_possible_wrap)]
    unsafe {
        libc::kill(pid as libc::pid_t, 0) == 0
    }
}

#[cfg(windows)]
fn is_process_running(pid: u32) -> bool {
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::OpenProcess;
    use winapi::um::winnt::PROCESS_QUERY_INFORMATION;

    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_INFORMATION, 0, pid);
        if handle.is_null() {
            false
        } else {
            CloseHandle(handle);
            true
        }
    }
}

#[cfg(not(any(unix, windows)))]
fn is_process_running(_pid: u32) -> bool {
    false
}
