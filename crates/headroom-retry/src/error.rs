//! Error types for retried operations.

use std::fmt;
use std::time::Duration;

use headroom_core::Retryable;

/// How one attempt failed, as reported by the operation being retried.
///
/// The operation closure passed to [`Retryer::run`](crate::Retryer::run)
/// classifies its own failures: `Transient` asks for another attempt,
/// `Permanent` stops the loop at once. For errors implementing
/// [`Retryable`], [`AttemptError::classified`] picks the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError<E> {
    /// The attempt failed in a way that may heal; retry it.
    Transient(E),
    /// The attempt failed for good; more tries would fail the same way.
    Permanent(E),
}

impl<E> AttemptError<E> {
    pub fn transient(error: E) -> Self {
        AttemptError::Transient(error)
    }

    pub fn permanent(error: E) -> Self {
        AttemptError::Permanent(error)
    }

    /// The wrapped error, either way.
    pub fn into_inner(self) -> E {
        match self {
            AttemptError::Transient(e) | AttemptError::Permanent(e) => e,
        }
    }
}

impl<E: Retryable> AttemptError<E> {
    /// Classifies `error` by asking it whether it is worth retrying.
    pub fn classified(error: E) -> Self {
        if error.is_retryable() {
            AttemptError::Transient(error)
        } else {
            AttemptError::Permanent(error)
        }
    }
}

/// Why a retried operation ultimately failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every allowed attempt failed with a transient error. Carries the
    /// error from the last attempt.
    Exhausted {
        attempts: u32,
        /// Time spent sleeping between attempts.
        total_delay: Duration,
        source: E,
    },
    /// An attempt failed with a permanent error, so the loop stopped early.
    Aborted { attempts: u32, source: E },
    /// The caller's cancellation token fired before an attempt succeeded.
    Cancelled {
        attempts: u32,
        total_delay: Duration,
    },
}

impl<E> RetryError<E> {
    /// How many attempts ran before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. }
            | RetryError::Aborted { attempts, .. }
            | RetryError::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }

    /// The last attempt's error, unless the loop was cancelled.
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::Aborted { source, .. } => {
                Some(source)
            }
            RetryError::Cancelled { .. } => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted {
                attempts, source, ..
            } => {
                write!(f, "retry budget exhausted after {attempts} attempts: {source}")
            }
            RetryError::Aborted {
                attempts, source, ..
            } => {
                write!(f, "permanent error on attempt {attempts}: {source}")
            }
            RetryError::Cancelled { attempts, .. } => {
                write!(f, "cancelled after {attempts} attempts")
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::Aborted { source, .. } => {
                Some(source)
            }
            RetryError::Cancelled { .. } => None,
        }
    }
}
