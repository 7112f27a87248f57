//! Events emitted by the rate limiter.

use std::time::{Duration, Instant};

use headroom_core::ComponentEvent;

/// Everything a rate limiter instance reports while it runs.
#[derive(Debug, Clone)]
pub enum RateLimitEvent {
    /// Server headers changed the tracked quota.
    Updated {
        limiter: String,
        at: Instant,
        limit: u32,
        remaining: u32,
    },
    /// Quota pressure forced a pause before the next request.
    Throttled {
        limiter: String,
        at: Instant,
        delay: Duration,
        /// Requests the server last reported remaining.
        remaining: u32,
    },
}

impl ComponentEvent for RateLimitEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RateLimitEvent::Updated { .. } => "rate_limit_updated",
            RateLimitEvent::Throttled { .. } => "rate_limit_throttled",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            RateLimitEvent::Updated { at, .. } | RateLimitEvent::Throttled { at, .. } => *at,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            RateLimitEvent::Updated { limiter, .. } | RateLimitEvent::Throttled { limiter, .. } => {
                limiter
            }
        }
    }
}
