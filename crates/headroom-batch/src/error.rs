//! Error types for batch execution.

use headroom_core::BoxError;

/// Why one operation in a batch produced no result.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The operation ran and failed.
    #[error("operation failed: {0}")]
    Failed(#[source] BoxError),
    /// The operation was cancelled before it ran, either by the caller's
    /// token or by `stop_on_error` reacting to an earlier failure.
    #[error("operation cancelled")]
    Cancelled,
    /// The operation's task panicked and never reported back.
    #[error("operation panicked")]
    Panicked,
}

impl TaskError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskError::Cancelled)
    }
}

/// One failed operation in a [`BatchOutcome`](crate::BatchOutcome).
#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the operation in the submitted batch.
    pub index: usize,
    /// Key the operation was submitted under.
    pub key: String,
    pub error: TaskError,
}
