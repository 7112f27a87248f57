//! Configuration for the rate limiter.

use std::sync::Arc;
use std::time::Duration;

use headroom_core::{EventListeners, FnListener};

use crate::events::RateLimitEvent;

/// Configuration for a [`RateLimiter`](crate::RateLimiter) instance.
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    pub(crate) name: String,
    pub(crate) threshold: f64,
    pub(crate) min_delay: Duration,
    pub(crate) max_delay: Duration,
    pub(crate) default_limit: u32,
    pub(crate) reset_buffer: Duration,
    pub(crate) event_listeners: EventListeners<RateLimitEvent>,
}

impl RateLimiterConfig {
    /// Creates a new builder with default settings.
    pub fn builder() -> RateLimiterConfigBuilder {
        RateLimiterConfigBuilder::new()
    }
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        RateLimiterConfigBuilder::new().build()
    }
}

/// Builder for [`RateLimiterConfig`].
#[derive(Debug, Clone)]
pub struct RateLimiterConfigBuilder {
    name: String,
    threshold: f64,
    min_delay: Duration,
    max_delay: Duration,
    default_limit: u32,
    reset_buffer: Duration,
    event_listeners: EventListeners<RateLimitEvent>,
}

impl RateLimiterConfigBuilder {
    /// Creates a builder with the default settings:
    ///
    /// - `threshold`: 0.2 (slow down once under 20% of the window is left)
    /// - `min_delay`: 100ms
    /// - `max_delay`: 5s
    /// - `default_limit`: 100 (assumed until the server says otherwise)
    /// - `reset_buffer`: 1s
    /// - `name`: `"<unnamed>"`
    pub fn new() -> Self {
        RateLimiterConfigBuilder {
            name: "<unnamed>".to_string(),
            threshold: 0.2,
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            default_limit: 100,
            reset_buffer: Duration::from_secs(1),
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the limiter name used in events, metrics labels, and logs.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the fraction of the window below which requests start to be
    /// delayed. Must be in `(0, 1]`.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the delay applied when quota pressure first crosses the
    /// threshold.
    pub fn min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    /// Sets the delay applied when the window is fully exhausted.
    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Sets the window size assumed before the server has reported one.
    pub fn default_limit(mut self, default_limit: u32) -> Self {
        self.default_limit = default_limit;
        self
    }

    /// Sets how long after the reported reset time the tracked window is
    /// still honored, to absorb clock skew between client and server.
    pub fn reset_buffer(mut self, reset_buffer: Duration) -> Self {
        self.reset_buffer = reset_buffer;
        self
    }

    /// Registers a callback invoked with the delay and the remaining quota
    /// each time a request is throttled.
    pub fn on_throttled<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration, u32) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &RateLimitEvent| {
                if let RateLimitEvent::Throttled {
                    delay, remaining, ..
                } = event
                {
                    f(*delay, *remaining);
                }
            })));
        self
    }

    /// Registers a callback invoked with the new limit and remaining count
    /// whenever server headers update the tracked window.
    pub fn on_updated<F>(mut self, f: F) -> Self
    where
        F: Fn(u32, u32) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &RateLimitEvent| {
                if let RateLimitEvent::Updated {
                    limit, remaining, ..
                } = event
                {
                    f(*limit, *remaining);
                }
            })));
        self
    }

    /// Builds the configuration.
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is outside `(0, 1]` or if `min_delay` exceeds
    /// `max_delay`.
    pub fn build(self) -> RateLimiterConfig {
        assert!(
            self.threshold > 0.0 && self.threshold <= 1.0,
            "threshold must be in (0, 1], got {}",
            self.threshold
        );
        assert!(
            self.min_delay <= self.max_delay,
            "min_delay ({:?}) must not exceed max_delay ({:?})",
            self.min_delay,
            self.max_delay
        );

        RateLimiterConfig {
            name: self.name,
            threshold: self.threshold,
            min_delay: self.min_delay,
            max_delay: self.max_delay,
            default_limit: self.default_limit,
            reset_buffer: self.reset_buffer,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for RateLimiterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
