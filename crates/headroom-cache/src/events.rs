//! Events emitted by the cache.

use std::time::{Duration, Instant};

use headroom_core::ComponentEvent;

/// Everything a cache instance reports while it runs.
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// A lookup was answered from the store.
    Hit {
        cache: String,
        at: Instant,
        key: String,
    },
    /// A lookup found nothing under the key.
    Miss {
        cache: String,
        at: Instant,
        key: String,
    },
    /// A lookup found an entry past its TTL and dropped it.
    Expired {
        cache: String,
        at: Instant,
        key: String,
        /// Lifetime the entry was stored with.
        ttl: Duration,
    },
    /// The capacity limit displaced the least recently used entry.
    Evicted {
        cache: String,
        at: Instant,
        key: String,
    },
    /// Entries were removed explicitly, by key, prefix, or clear.
    Invalidated {
        cache: String,
        at: Instant,
        count: usize,
    },
}

impl ComponentEvent for CacheEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CacheEvent::Hit { .. } => "cache_hit",
            CacheEvent::Miss { .. } => "cache_miss",
            CacheEvent::Expired { .. } => "cache_expired",
            CacheEvent::Evicted { .. } => "cache_evicted",
            CacheEvent::Invalidated { .. } => "cache_invalidated",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CacheEvent::Hit { at, .. }
            | CacheEvent::Miss { at, .. }
            | CacheEvent::Expired { at, .. }
            | CacheEvent::Evicted { at, .. }
            | CacheEvent::Invalidated { at, .. } => *at,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            CacheEvent::Hit { cache, .. }
            | CacheEvent::Miss { cache, .. }
            | CacheEvent::Expired { cache, .. }
            | CacheEvent::Evicted { cache, .. }
            | CacheEvent::Invalidated { cache, .. } => cache,
        }
    }
}
