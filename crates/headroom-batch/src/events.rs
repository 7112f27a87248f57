//! Events emitted by the batch executor.

use std::time::{Duration, Instant};

use headroom_core::ComponentEvent;

/// Everything a batch executor instance reports while it runs.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// A batch was submitted.
    Started {
        batch: String,
        at: Instant,
        operations: usize,
    },
    /// One operation in the batch failed or was cancelled.
    ItemFailed {
        batch: String,
        at: Instant,
        index: usize,
        key: String,
    },
    /// The whole batch finished.
    Completed {
        batch: String,
        at: Instant,
        succeeded: usize,
        failed: usize,
        duration: Duration,
    },
}

impl ComponentEvent for BatchEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BatchEvent::Started { .. } => "batch_started",
            BatchEvent::ItemFailed { .. } => "batch_item_failed",
            BatchEvent::Completed { .. } => "batch_completed",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            BatchEvent::Started { at, .. }
            | BatchEvent::ItemFailed { at, .. }
            | BatchEvent::Completed { at, .. } => *at,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            BatchEvent::Started { batch, .. }
            | BatchEvent::ItemFailed { batch, .. }
            | BatchEvent::Completed { batch, .. } => batch,
        }
    }
}
