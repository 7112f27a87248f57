//! TTL and LRU response cache for rate-limited API clients.
//!
//! Every request a cache absorbs is a request that never touches the remote
//! API's quota. The cache stores cloneable response values under string
//! keys, drops entries once their TTL passes, and evicts the least recently
//! used entry when the capacity limit is reached.
//!
//! # Features
//!
//! - `metrics`: emit lookup, eviction, and size metrics via the `metrics`
//!   crate facade.
//! - `tracing`: log cache activity at debug level via `tracing`.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use headroom_cache::{Cache, CacheConfig, cache_key};
//!
//! let config = CacheConfig::builder()
//!     .name("plans")
//!     .max_entries(500)
//!     .default_ttl(Duration::from_secs(60))
//!     .build();
//! let cache: Cache<String> = Cache::new(config);
//!
//! let key = cache_key("plans", ["123"]);
//! cache.put(key.clone(), "Growth".to_string());
//! assert_eq!(cache.get(&key), Some("Growth".to_string()));
//!
//! // After a mutation, drop every cached response for the operation.
//! cache.invalidate_prefix("plans:");
//! assert!(cache.is_empty());
//! ```

mod cache;
mod config;
mod events;
mod key;
mod store;

pub use cache::Cache;
pub use config::{CacheConfig, CacheConfigBuilder};
pub use events::CacheEvent;
pub use key::cache_key;
pub use store::CacheStats;
