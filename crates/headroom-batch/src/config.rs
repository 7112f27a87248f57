//! Configuration for the batch executor.

use std::sync::Arc;
use std::time::Duration;

use headroom_core::{EventListeners, FnListener};

use crate::events::BatchEvent;

/// Configuration for a [`BatchExecutor`](crate::BatchExecutor) instance.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub(crate) name: String,
    pub(crate) concurrency: usize,
    pub(crate) stop_on_error: bool,
    pub(crate) event_listeners: EventListeners<BatchEvent>,
}

impl BatchConfig {
    /// Creates a new builder with default settings.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::new()
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfigBuilder::new().build()
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug, Clone)]
pub struct BatchConfigBuilder {
    name: String,
    concurrency: usize,
    stop_on_error: bool,
    event_listeners: EventListeners<BatchEvent>,
}

impl BatchConfigBuilder {
    /// Creates a builder with the default settings:
    ///
    /// - `concurrency`: 3
    /// - `stop_on_error`: false
    /// - `name`: `"<unnamed>"`
    pub fn new() -> Self {
        BatchConfigBuilder {
            name: "<unnamed>".to_string(),
            concurrency: 3,
            stop_on_error: false,
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the executor name used in events, metrics labels, and logs.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets how many operations may run at once. A value of 0 or 1 runs
    /// the batch sequentially in submission order.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// When set, the first failure cancels every operation that has not
    /// started yet. Operations already in flight finish on their own.
    pub fn stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    /// Registers a callback invoked with the operation count when a batch
    /// is submitted.
    pub fn on_started<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &BatchEvent| {
                if let BatchEvent::Started { operations, .. } = event {
                    f(*operations);
                }
            })));
        self
    }

    /// Registers a callback invoked with the index and key of each failed
    /// operation.
    pub fn on_item_failed<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, &str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &BatchEvent| {
                if let BatchEvent::ItemFailed { index, key, .. } = event {
                    f(*index, key);
                }
            })));
        self
    }

    /// Registers a callback invoked with the success count, failure count,
    /// and wall time when a batch finishes.
    pub fn on_completed<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize, Duration) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &BatchEvent| {
                if let BatchEvent::Completed {
                    succeeded,
                    failed,
                    duration,
                    ..
                } = event
                {
                    f(*succeeded, *failed, *duration);
                }
            })));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> BatchConfig {
        BatchConfig {
            name: self.name,
            concurrency: self.concurrency,
            stop_on_error: self.stop_on_error,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for BatchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
