//! Confirmation gate for destructive actions (board reset, task deletion).

pub const RESET_BOARD_PROMPT: &str =
    "Are you sure you want to reset the board? This will delete all tasks.";
pub const DELETE_TASK_PROMPT: &str = "Are you sure you want to delete this task?";

pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Answers yes without asking, for callers that already obtained consent
/// (e.g. a `--yes` flag).
pub struct Preconfirmed;

impl Confirm for Preconfirmed {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

pub struct Declined;

impl Confirm for Declined {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
