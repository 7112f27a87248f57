//! Client-side resilience toolkit for rate-limited APIs.
//!
//! `headroom` sits between your application and a quota-limited HTTP API
//! and keeps you inside the quota instead of bouncing off it: an adaptive
//! rate limiter that slows down as the window drains, a TTL/LRU response
//! cache, a retryer with exponential backoff, a bounded-concurrency batch
//! toolkit, and a health checker over all of it. Every component is
//! available as its own crate and as a feature of this one.
//!
//! # Components
//!
//! - **Rate limiter** (`ratelimit` feature): watches `X-RateLimit-*` /
//!   `RateLimit-*` response headers and delays requests before the server
//!   would have to.
//! - **Cache** (`cache` feature): TTL plus LRU response cache; every hit
//!   is quota that stays unspent.
//! - **Retry** (`retry` feature): exponential backoff with jitter,
//!   cancellation, and retryability classification.
//! - **Batch** (`batch` feature): concurrency-capped batch execution,
//!   pagination, pipelines, and result collection.
//! - **Health** (`health` feature): composes the other components' state
//!   into one serializable status report.
//!
//! # Usage
//!
//! The default features enable the whole toolkit:
//!
//! ```toml
//! [dependencies]
//! headroom = "0.3"
//! ```
//!
//! Or pick components and turn on observability:
//!
//! ```toml
//! [dependencies]
//! headroom = { version = "0.3", default-features = false, features = ["ratelimit", "retry", "metrics"] }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "ratelimit", feature = "retry"))]
//! # {
//! use headroom::ratelimit::{RateLimiter, RateLimiterConfig};
//! use headroom::retry::{Retryer, RetryConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let limiter = RateLimiter::new(
//!     RateLimiterConfig::builder().name("api").build(),
//! );
//! let retryer = Retryer::new(RetryConfig::builder().max_attempts(4).build());
//!
//! let cancel = CancellationToken::new();
//! let result = retryer
//!     .run_auto(&cancel, || async {
//!         limiter.acquire().await;
//!         // ... perform the request, feed the response headers back in
//!         // via limiter.update_from_response(...), return the body ...
//!         Ok::<_, headroom::core::BoxError>(String::new())
//!     })
//!     .await;
//!
//! match result {
//!     Ok(outcome) => println!("fetched {} bytes", outcome.value.len()),
//!     Err(error) => eprintln!("request failed for good: {error}"),
//! }
//! # }
//! # }
//! ```
//!
//! # Individual crates
//!
//! Each component also ships standalone for minimal dependency trees:
//!
//! - `headroom-ratelimit`
//! - `headroom-cache`
//! - `headroom-retry`
//! - `headroom-batch`
//! - `headroom-health`
//! - `headroom-core` (shared error and event infrastructure)

// Re-export core (always available)
pub use headroom_core as core;

// Re-export components based on features
#[cfg(feature = "batch")]
pub use headroom_batch as batch;

#[cfg(feature = "cache")]
pub use headroom_cache as cache;

#[cfg(feature = "health")]
pub use headroom_health as health;

#[cfg(feature = "ratelimit")]
pub use headroom_ratelimit as ratelimit;

#[cfg(feature = "retry")]
pub use headroom_retry as retry;
