//! Property-based tests for the headroom components.
//!
//! Run with: cargo test --test property_tests
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold across the components.

pub mod backoff;
pub mod batch;
pub mod cache;
