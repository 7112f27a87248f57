//! Configuration for the cache.

use std::sync::Arc;
use std::time::Duration;

use headroom_core::{EventListeners, FnListener};

use crate::events::CacheEvent;

/// Configuration for a [`Cache`](crate::Cache) instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub(crate) name: String,
    pub(crate) max_entries: usize,
    pub(crate) default_ttl: Duration,
    pub(crate) event_listeners: EventListeners<CacheEvent>,
}

impl CacheConfig {
    /// Creates a new builder with default settings.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::new()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfigBuilder::new().build()
    }
}

/// Builder for [`CacheConfig`].
#[derive(Debug, Clone)]
pub struct CacheConfigBuilder {
    name: String,
    max_entries: usize,
    default_ttl: Duration,
    event_listeners: EventListeners<CacheEvent>,
}

impl CacheConfigBuilder {
    /// Creates a builder with the default settings:
    ///
    /// - `max_entries`: 100
    /// - `default_ttl`: 5 minutes
    /// - `name`: `"<unnamed>"`
    pub fn new() -> Self {
        CacheConfigBuilder {
            name: "<unnamed>".to_string(),
            max_entries: 100,
            default_ttl: Duration::from_secs(300),
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the cache name used in events, metrics labels, and logs.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the capacity. When full, the least recently used entry is
    /// evicted to make room. A value of 0 is treated as 1.
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets the lifetime applied by [`Cache::put`](crate::Cache::put).
    /// Entries older than this are treated as misses and dropped.
    pub fn default_ttl(mut self, default_ttl: Duration) -> Self {
        self.default_ttl = default_ttl;
        self
    }

    /// Registers a callback invoked with the key on every cache hit.
    pub fn on_hit<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &CacheEvent| {
                if let CacheEvent::Hit { key, .. } = event {
                    f(key);
                }
            })));
        self
    }

    /// Registers a callback invoked with the key on every cache miss.
    pub fn on_miss<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &CacheEvent| {
                if let CacheEvent::Miss { key, .. } = event {
                    f(key);
                }
            })));
        self
    }

    /// Registers a callback invoked with the key when a lookup finds an
    /// entry past its TTL.
    pub fn on_expired<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &CacheEvent| {
                if let CacheEvent::Expired { key, .. } = event {
                    f(key);
                }
            })));
        self
    }

    /// Registers a callback invoked with the displaced key when the
    /// capacity limit evicts an entry.
    pub fn on_evicted<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &CacheEvent| {
                if let CacheEvent::Evicted { key, .. } = event {
                    f(key);
                }
            })));
        self
    }

    /// Registers a callback invoked with the removed entry count after an
    /// explicit invalidation.
    pub fn on_invalidated<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(Arc::new(FnListener::new(move |event: &CacheEvent| {
                if let CacheEvent::Invalidated { count, .. } = event {
                    f(*count);
                }
            })));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> CacheConfig {
        CacheConfig {
            name: self.name,
            max_entries: self.max_entries,
            default_ttl: self.default_ttl,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
