//! Shared cache handle.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter, describe_gauge, gauge};
#[cfg(feature = "tracing")]
use tracing::debug;

use headroom_core::EventListeners;

use crate::config::CacheConfig;
use crate::events::CacheEvent;
use crate::store::{CacheStats, CacheStore, Insert, Lookup};

/// A TTL and LRU bounded response cache.
///
/// Values are stored under string keys (see
/// [`cache_key`](crate::cache_key) for building them) and served until
/// their TTL passes or the capacity limit displaces them. Lookups refresh
/// recency, so frequently read entries survive longest.
///
/// Cloning is cheap; clones share the same store and counters.
#[derive(Clone)]
pub struct Cache<V> {
    store: Arc<Mutex<CacheStore<V>>>,
    name: String,
    default_ttl: Duration,
    listeners: EventListeners<CacheEvent>,
}

impl<V: Clone> Cache<V> {
    /// Creates a cache from the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            describe_counter!("cache_requests_total", "Cache lookups by result");
            describe_counter!(
                "cache_evictions_total",
                "Cache entries displaced by the capacity limit"
            );
            describe_gauge!("cache_size", "Entries currently cached");
        }

        Cache {
            store: Arc::new(Mutex::new(CacheStore::new(config.max_entries))),
            name: config.name,
            default_ttl: config.default_ttl,
            listeners: config.event_listeners,
        }
    }

    /// The name this cache reports in events, metrics, and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a value. Expired entries are dropped and reported as
    /// misses.
    pub fn get(&self, key: &str) -> Option<V> {
        let outcome = self.store.lock().unwrap().lookup(key);

        // Listener callbacks run outside the store lock.
        match outcome {
            Lookup::Hit(value) => {
                #[cfg(feature = "metrics")]
                counter!("cache_requests_total", "cache" => self.name.clone(), "result" => "hit")
                    .increment(1);
                #[cfg(feature = "tracing")]
                debug!(cache = %self.name, key, "Cache hit");
                self.listeners.emit(&CacheEvent::Hit {
                    cache: self.name.clone(),
                    at: Instant::now(),
                    key: key.to_string(),
                });
                Some(value)
            }
            Lookup::Expired(ttl) => {
                #[cfg(feature = "metrics")]
                counter!("cache_requests_total", "cache" => self.name.clone(), "result" => "expired")
                    .increment(1);
                #[cfg(feature = "tracing")]
                debug!(cache = %self.name, key, "Cache entry expired");
                self.listeners.emit(&CacheEvent::Expired {
                    cache: self.name.clone(),
                    at: Instant::now(),
                    key: key.to_string(),
                    ttl,
                });
                None
            }
            Lookup::Miss => {
                #[cfg(feature = "metrics")]
                counter!("cache_requests_total", "cache" => self.name.clone(), "result" => "miss")
                    .increment(1);
                #[cfg(feature = "tracing")]
                debug!(cache = %self.name, key, "Cache miss");
                self.listeners.emit(&CacheEvent::Miss {
                    cache: self.name.clone(),
                    at: Instant::now(),
                    key: key.to_string(),
                });
                None
            }
        }
    }

    /// Stores a value with the configured default TTL.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    /// Stores a value with an explicit TTL, overriding the default.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let outcome = {
            let mut store = self.store.lock().unwrap();
            let outcome = store.insert(key, value, ttl);
            #[cfg(feature = "metrics")]
            gauge!("cache_size", "cache" => self.name.clone()).set(store.len() as f64);
            outcome
        };

        if let Insert::Displaced(evicted) = outcome {
            #[cfg(feature = "metrics")]
            counter!("cache_evictions_total", "cache" => self.name.clone()).increment(1);
            #[cfg(feature = "tracing")]
            debug!(cache = %self.name, key = %evicted, "Cache entry evicted");
            self.listeners.emit(&CacheEvent::Evicted {
                cache: self.name.clone(),
                at: Instant::now(),
                key: evicted,
            });
        }
    }

    /// Removes a single entry. Returns `true` if it was present.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = {
            let mut store = self.store.lock().unwrap();
            let removed = store.remove(key);
            #[cfg(feature = "metrics")]
            gauge!("cache_size", "cache" => self.name.clone()).set(store.len() as f64);
            removed
        };

        if removed {
            self.emit_invalidated(1);
        }
        removed
    }

    /// Removes every entry whose key starts with `prefix` and returns how
    /// many were dropped. Useful after a write that stales a whole family
    /// of responses, such as `plans:` after a plan mutation.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let count = {
            let mut store = self.store.lock().unwrap();
            let count = store.remove_prefix(prefix);
            #[cfg(feature = "metrics")]
            gauge!("cache_size", "cache" => self.name.clone()).set(store.len() as f64);
            count
        };

        if count > 0 {
            self.emit_invalidated(count);
        }
        count
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let count = {
            let mut store = self.store.lock().unwrap();
            let count = store.clear();
            #[cfg(feature = "metrics")]
            gauge!("cache_size", "cache" => self.name.clone()).set(0.0);
            count
        };

        if count > 0 {
            self.emit_invalidated(count);
        }
    }

    /// Number of live entries, expired or not.
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the hit, miss, expiry, and eviction counters.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().unwrap().stats()
    }

    fn emit_invalidated(&self, count: usize) {
        #[cfg(feature = "tracing")]
        debug!(cache = %self.name, count, "Cache entries invalidated");
        self.listeners.emit(&CacheEvent::Invalidated {
            cache: self.name.clone(),
            at: Instant::now(),
            count,
        });
    }
}
