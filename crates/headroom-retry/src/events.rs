//! Events emitted by the retryer.

use std::time::{Duration, Instant};

use headroom_core::ComponentEvent;

/// Everything a retryer instance reports while it runs.
#[derive(Debug, Clone)]
pub enum RetryEvent {
    /// An attempt failed with a transient error; another will run after
    /// `delay`.
    Retry {
        retryer: String,
        at: Instant,
        /// The attempt that just failed (1-based).
        attempt: u32,
        delay: Duration,
    },
    /// An attempt succeeded.
    Succeeded {
        retryer: String,
        at: Instant,
        attempts: u32,
        total_delay: Duration,
    },
    /// Every allowed attempt failed.
    Exhausted {
        retryer: String,
        at: Instant,
        attempts: u32,
        total_delay: Duration,
    },
    /// A permanent error stopped the loop early.
    Aborted {
        retryer: String,
        at: Instant,
        attempt: u32,
    },
    /// The caller's cancellation token fired.
    Cancelled {
        retryer: String,
        at: Instant,
        attempt: u32,
    },
}

impl ComponentEvent for RetryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RetryEvent::Retry { .. } => "retry_attempt",
            RetryEvent::Succeeded { .. } => "retry_succeeded",
            RetryEvent::Exhausted { .. } => "retry_exhausted",
            RetryEvent::Aborted { .. } => "retry_aborted",
            RetryEvent::Cancelled { .. } => "retry_cancelled",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            RetryEvent::Retry { at, .. }
            | RetryEvent::Succeeded { at, .. }
            | RetryEvent::Exhausted { at, .. }
            | RetryEvent::Aborted { at, .. }
            | RetryEvent::Cancelled { at, .. } => *at,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            RetryEvent::Retry { retryer, .. }
            | RetryEvent::Succeeded { retryer, .. }
            | RetryEvent::Exhausted { retryer, .. }
            | RetryEvent::Aborted { retryer, .. }
            | RetryEvent::Cancelled { retryer, .. } => retryer,
        }
    }
}
