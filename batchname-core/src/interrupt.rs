use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether we are currently asking the user a question on the terminal.
static PROMPT_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Set once the user asked us to stop (Ctrl-C).
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// RAII helper that marks a prompt as active while it is in scope.
pub struct PromptGuard;

impl PromptGuard {
    pub fn activate() -> Self {
        PROMPT_ACTIVE.store(true, Ordering::SeqCst);
        Self
    }
}

impl Drop for PromptGuard {
    fn drop(&mut self) {
        PROMPT_ACTIVE.store(false, Ordering::SeqCst);
    }
}

/// Returns true when a prompt is currently waiting for input.
pub fn prompt_active() -> bool {
    PROMPT_ACTIVE.load(Ordering::SeqCst)
}

/// Record an interruption. Running batches stop before their next file.
pub fn request_interrupt() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_guard_resets_on_drop() {
        {
            let _guard = PromptGuard::activate();
            assert!(prompt_active());
        }
        assert!(!prompt_active());
    }
}
