//! Core infrastructure shared by the headroom resilience components.
//!
//! This crate provides the pieces every component builds on:
//!
//! - [`ApiError`]: a structured error for remote API failures, carrying the
//!   HTTP status, a provider error code, and any `Retry-After` hint sent by
//!   the server.
//! - [`Retryable`]: classification of errors into retryable and permanent,
//!   used by the retry component and available to applications.
//! - [`events`]: the event system that lets applications observe component
//!   behavior (cache evictions, rate limit waits, retry attempts) without
//!   coupling to a specific metrics or logging backend.
//!
//! Applications normally depend on the component crates (or the `headroom`
//! facade) rather than on this crate directly.

pub mod error;
pub mod events;

pub use error::{ApiError, BoxError, Retryable};
pub use events::{ComponentEvent, EventListener, EventListeners, FnListener};
