//! Retry with exponential backoff, jitter, and error classification.
//!
//! The retryer reruns a fallible async operation until it succeeds, the
//! attempt budget runs out, a permanent error appears, or the caller's
//! cancellation token fires. Operations classify their own failures
//! through [`AttemptError`], or hand the decision to
//! [`Retryer::run_auto`], which understands
//! [`ApiError`](headroom_core::ApiError) status codes and falls back to
//! scanning opaque error messages with a [`TextClassifier`].
//!
//! # Features
//!
//! - `metrics`: emit retry and exhaustion counters via the `metrics` crate
//!   facade.
//! - `tracing`: log retry decisions at debug level via `tracing`.
//!
//! # Example
//!
//! ```
//! use headroom_retry::{AttemptError, Retryer, RetryConfig};
//! use headroom_core::ApiError;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let retryer = Retryer::new(
//!     RetryConfig::builder()
//!         .name("api")
//!         .max_attempts(3)
//!         .build(),
//! );
//!
//! let cancel = CancellationToken::new();
//! let outcome = retryer
//!     .run(&cancel, || async {
//!         // One attempt against the remote API.
//!         Ok::<_, AttemptError<ApiError>>("plan 123".to_string())
//!     })
//!     .await
//!     .unwrap();
//! assert_eq!(outcome.value, "plan 123");
//! assert_eq!(outcome.attempts, 1);
//! # }
//! ```

mod backoff;
mod classify;
mod config;
mod error;
mod events;
mod retryer;

pub use backoff::BackoffSchedule;
pub use classify::TextClassifier;
pub use config::{RetryConfig, RetryConfigBuilder};
pub use error::{AttemptError, RetryError};
pub use events::RetryEvent;
pub use retryer::{RetryOutcome, Retryer};
