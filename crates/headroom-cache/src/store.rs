//! Bounded entry store with TTL tracking.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::Serialize;

/// A cached value with its insertion time and lifetime.
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    pub(crate) value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    pub(crate) fn new(value: V, ttl: Duration) -> Self {
        Entry {
            value,
            inserted_at: Instant::now(),
            ttl,
        }
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > self.ttl
    }
}

/// Result of a single store lookup.
pub(crate) enum Lookup<V> {
    Hit(V),
    /// The entry's TTL had passed; carries the lifetime it was stored with.
    Expired(Duration),
    Miss,
}

/// Result of a single insert.
pub(crate) enum Insert {
    Stored,
    /// Capacity was reached and the least recently used entry made room.
    Displaced(String),
}

/// LRU-ordered entry store. All access goes through the owning cache's lock.
pub(crate) struct CacheStore<V> {
    entries: LruCache<String, Entry<V>>,
    counters: Counters,
    max_entries: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    hits: u64,
    misses: u64,
    expired: u64,
    evictions: u64,
}

impl<V: Clone> CacheStore<V> {
    /// Creates a store holding at most `max_entries` values. A limit of 0 is
    /// treated as 1, the smallest capacity the store supports.
    pub(crate) fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        CacheStore {
            entries: LruCache::new(capacity),
            counters: Counters::default(),
            max_entries: capacity.get(),
        }
    }

    /// Looks up `key`, counting the outcome and dropping the entry if its
    /// TTL has passed. A hit refreshes the entry's recency.
    pub(crate) fn lookup(&mut self, key: &str) -> Lookup<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_expired() => true,
            Some(entry) => {
                self.counters.hits += 1;
                return Lookup::Hit(entry.value.clone());
            }
            None => false,
        };

        if expired {
            let entry = self.entries.pop(key);
            self.counters.expired += 1;
            // An expired entry is still a miss from the caller's view.
            self.counters.misses += 1;
            match entry {
                Some(entry) => Lookup::Expired(entry.ttl),
                None => Lookup::Miss,
            }
        } else {
            self.counters.misses += 1;
            Lookup::Miss
        }
    }

    /// Inserts `value` under `key`, evicting the least recently used entry
    /// when the store is full.
    pub(crate) fn insert(&mut self, key: String, value: V, ttl: Duration) -> Insert {
        match self.entries.push(key.clone(), Entry::new(value, ttl)) {
            Some((displaced, _)) if displaced != key => {
                self.counters.evictions += 1;
                Insert::Displaced(displaced)
            }
            _ => Insert::Stored,
        }
    }

    pub(crate) fn remove(&mut self, key: &str) -> bool {
        self.entries.pop(key).is_some()
    }

    pub(crate) fn remove_prefix(&mut self, prefix: &str) -> usize {
        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &matching {
            self.entries.pop(key);
        }
        matching.len()
    }

    pub(crate) fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits,
            misses: self.counters.misses,
            expired: self.counters.expired,
            evictions: self.counters.evictions,
            size: self.entries.len(),
            max_entries: self.max_entries,
        }
    }
}

/// Point-in-time counters for one cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the store.
    pub hits: u64,
    /// Lookups that found nothing usable, including expired entries.
    pub misses: u64,
    /// Lookups that found an entry past its TTL.
    pub expired: u64,
    /// Entries displaced by the capacity limit.
    pub evictions: u64,
    /// Entries currently stored.
    pub size: usize,
    /// Configured capacity.
    pub max_entries: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the store, 0.0 when nothing has
    /// been looked up yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
