//! Configuration for the retryer.

use std::sync::Arc;
use std::time::Duration;

use headroom_core::{EventListeners, FnListener};

use crate::classify::TextClassifier;
use crate::events::RetryEvent;

/// Configuration for a [`Retryer`](crate::Retryer) instance.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub(crate) name: String,
    pub(crate) max_attempts: u32,
    pub(crate) base_delay: Duration,
    pub(crate) max_delay: Duration,
    pub(crate) multiplier: f64,
    pub(crate) jitter: f64,
    pub(crate) classifier: TextClassifier,
    pub(crate) event_listeners: EventListeners<RetryEvent>,
}

impl RetryConfig {
    /// Creates a new builder with default settings.
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfigBuilder::new().build()
    }
}

/// Builder for [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct RetryConfigBuilder {
    name: String,
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: f64,
    classifier: TextClassifier,
    event_listeners: EventListeners<RetryEvent>,
}

impl RetryConfigBuilder {
    /// Creates a builder with the default settings:
    ///
    /// - `max_attempts`: 3
    /// - `base_delay`: 500ms
    /// - `max_delay`: 30s
    /// - `multiplier`: 2.0
    /// - `jitter`: 0.1
    /// - `classifier`: [`TextClassifier::default`]
    /// - `name`: `"<unnamed>"`
    pub fn new() -> Self {
        RetryConfigBuilder {
            name: "<unnamed>".to_string(),
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.1,
            classifier: TextClassifier::default(),
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the retryer name used in events, metrics labels, and logs.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the attempt budget, counting the first try. Must be at least 1.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the delay before the first retry.
    pub fn base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Sets the ceiling no backoff delay will exceed.
    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Sets the factor each successive delay grows by. Must be at least 1.
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the jitter fraction in `[0, 1]`: each delay is scattered by up
    /// to this fraction of itself in either direction.
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Replaces the classifier [`Retryer::run_auto`](crate::Retryer::run_auto)
    /// uses for errors that carry no status code.
    pub fn classifier(mut self, classifier: TextClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Registers a callback invoked with the failed attempt number and the
    /// upcoming delay before each retry.
    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(u32, Duration) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &RetryEvent| {
                if let RetryEvent::Retry { attempt, delay, .. } = event {
                    f(*attempt, *delay);
                }
            })));
        self
    }

    /// Registers a callback invoked with the attempt count and total sleep
    /// time when an attempt succeeds.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(u32, Duration) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &RetryEvent| {
                if let RetryEvent::Succeeded {
                    attempts,
                    total_delay,
                    ..
                } = event
                {
                    f(*attempts, *total_delay);
                }
            })));
        self
    }

    /// Registers a callback invoked with the attempt count when the budget
    /// runs out.
    pub fn on_exhausted<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &RetryEvent| {
                if let RetryEvent::Exhausted { attempts, .. } = event {
                    f(*attempts);
                }
            })));
        self
    }

    /// Registers a callback invoked with the attempt number when a
    /// permanent error stops the loop.
    pub fn on_aborted<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &RetryEvent| {
                if let RetryEvent::Aborted { attempt, .. } = event {
                    f(*attempt);
                }
            })));
        self
    }

    /// Registers a callback invoked with the attempt number when the
    /// caller's cancellation token fires.
    pub fn on_cancelled<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &RetryEvent| {
                if let RetryEvent::Cancelled { attempt, .. } = event {
                    f(*attempt);
                }
            })));
        self
    }

    /// Builds the configuration.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is 0, `multiplier` is below 1, `jitter` is
    /// outside `[0, 1]`, or `base_delay` exceeds `max_delay`.
    pub fn build(self) -> RetryConfig {
        assert!(self.max_attempts >= 1, "max_attempts must be at least 1");
        assert!(
            self.multiplier >= 1.0,
            "multiplier must be at least 1, got {}",
            self.multiplier
        );
        assert!(
            (0.0..=1.0).contains(&self.jitter),
            "jitter must be in [0, 1], got {}",
            self.jitter
        );
        assert!(
            self.base_delay <= self.max_delay,
            "base_delay ({:?}) must not exceed max_delay ({:?})",
            self.base_delay,
            self.max_delay
        );

        RetryConfig {
            name: self.name,
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
            max_delay: self.max_delay,
            multiplier: self.multiplier,
            jitter: self.jitter,
            classifier: self.classifier,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for RetryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
