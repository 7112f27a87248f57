//! Bounded-concurrency batch tools for rate-limited API clients.
//!
//! Sync jobs against a quota-limited API all need the same scaffolding:
//! run many independent calls without stampeding the server, walk
//! paginated listings, thread a value through multi-step transformations,
//! and gather results from concurrent tasks. This crate packages those
//! four pieces:
//!
//! - [`BatchExecutor`] runs keyed operations under a concurrency ceiling
//!   with per-item failure reporting and optional fail-fast cancellation.
//! - [`Paginator`] fetches numbered pages and keeps partial results when
//!   a fetch fails mid-run.
//! - [`Pipeline`] chains steps and reports the last good value on failure.
//! - [`Collector`] accumulates values from many tasks behind a lock.
//!
//! # Features
//!
//! - `metrics`: emit per-batch counters via the `metrics` crate facade.
//! - `tracing`: log batch progress at debug level via `tracing`.
//!
//! # Example
//!
//! ```
//! use headroom_batch::{BatchConfig, BatchExecutor, BatchOperation};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let executor = BatchExecutor::new(
//!     BatchConfig::builder()
//!         .name("plan-sync")
//!         .concurrency(2)
//!         .build(),
//! );
//!
//! let ops = vec![
//!     BatchOperation::new("plan-1", async { Ok(1) }),
//!     BatchOperation::new("plan-2", async { Ok(2) }),
//! ];
//! let outcome = executor.run(&CancellationToken::new(), ops).await;
//! assert!(outcome.is_complete());
//! assert_eq!(outcome.successes(), vec![1, 2]);
//! # }
//! ```

mod collector;
mod config;
mod error;
mod events;
mod executor;
mod paginate;
mod pipeline;

pub use collector::Collector;
pub use config::{BatchConfig, BatchConfigBuilder};
pub use error::{BatchFailure, TaskError};
pub use events::BatchEvent;
pub use executor::{BatchExecutor, BatchOperation, BatchOutcome};
pub use paginate::{Page, PaginateError, PaginatedResult, Paginator};
pub use pipeline::{Pipeline, PipelineError, PipelineFailure};
