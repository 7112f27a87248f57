//! Adaptive client-side rate limiter driven by server rate limit headers.
//!
//! Instead of hammering an API until it answers 429, the limiter watches
//! the `X-RateLimit-*` / `RateLimit-*` headers on every response and slows
//! the client down *before* the window runs out. Above the configured
//! threshold requests pass through untouched; below it, each request waits
//! a delay that scales from `min_delay` at the threshold up to `max_delay`
//! when the window is empty.
//!
//! # Features
//!
//! - `metrics`: emit wait counts and window gauges via the `metrics` crate
//!   facade.
//! - `tracing`: log throttling decisions at debug level via `tracing`.
//!
//! # Example
//!
//! ```
//! use headroom_ratelimit::{RateLimiter, RateLimiterConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let limiter = RateLimiter::new(
//!     RateLimiterConfig::builder()
//!         .name("api")
//!         .threshold(0.2)
//!         .build(),
//! );
//!
//! // Before each request: waits only when the window is under pressure.
//! limiter.acquire().await;
//!
//! // After each response: keep the tracked window honest.
//! // limiter.update_from_response(response.headers());
//! # }
//! ```

mod config;
mod events;
mod headers;
mod limiter;

pub use config::{RateLimiterConfig, RateLimiterConfigBuilder};
pub use events::RateLimitEvent;
pub use limiter::{LimiterState, RateLimiter, RETRY_AFTER_CEILING};
