//! Health reporting over the headroom components.
//!
//! Composes read-only state from the rate limiter and cache, plus an
//! optional live API probe, into one serializable report for a status
//! endpoint. The checker only consumes the other crates' snapshots; it
//! never influences their behavior.
//!
//! # Example
//!
//! ```
//! use headroom_health::HealthChecker;
//! use headroom_ratelimit::{RateLimiter, RateLimiterConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let limiter = RateLimiter::new(RateLimiterConfig::builder().name("api").build());
//!
//! let checker = HealthChecker::builder()
//!     .version("1.4.2")
//!     .rate_limiter(limiter.clone())
//!     .build();
//!
//! // Shallow check: in-process state only, no API call.
//! let report = checker.check(false).await;
//! assert!(report.is_healthy());
//! println!("{}", report.to_json().unwrap());
//! # }
//! ```

mod checker;
mod report;

pub use checker::{HealthChecker, HealthCheckerBuilder};
pub use report::{ComponentHealth, HealthReport, HealthStatus, RateLimitSummary};
