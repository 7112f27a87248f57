//! The adaptive limiter.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use http::header::RETRY_AFTER;
use http::{HeaderMap, StatusCode};

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter, describe_gauge, gauge};
#[cfg(feature = "tracing")]
use tracing::debug;

use headroom_core::EventListeners;

use crate::config::RateLimiterConfig;
use crate::events::RateLimitEvent;
use crate::headers;

/// Longest server-declared wait [`RateLimiter::should_retry`] will accept.
/// A `Retry-After` beyond this means the caller should surface the failure
/// rather than block a task for minutes on an automatic retry.
pub const RETRY_AFTER_CEILING: Duration = Duration::from_secs(60);

/// Client-side rate limiter that adapts to server headers.
///
/// The limiter assumes a full window until response headers teach it
/// otherwise. While plenty of quota remains, [`acquire`](Self::acquire)
/// returns immediately; once the remaining fraction drops to the
/// configured threshold, each call pauses for a delay that grows as the
/// window drains. This smears the final requests of a window over time
/// instead of slamming into a 429.
///
/// The limiter never counts requests itself. The tracked window moves only
/// when [`update_from_response`](Self::update_from_response) feeds it
/// server headers, so concurrent callers each observe the same state and
/// sleep independently. That makes the throttling advisory, not an
/// admission queue, which is all a client-side limiter can honestly be.
///
/// Cloning is cheap; clones share the same window state.
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<LimiterState>>,
    name: String,
    threshold: f64,
    min_delay: Duration,
    max_delay: Duration,
    reset_buffer: Duration,
    listeners: EventListeners<RateLimitEvent>,
}

impl RateLimiter {
    /// Creates a limiter from the given configuration.
    pub fn new(config: RateLimiterConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            describe_counter!("rate_limiter_waits_total", "Requests delayed by quota pressure");
            describe_gauge!("rate_limiter_limit", "Size of the server's rate limit window");
            describe_gauge!("rate_limiter_remaining", "Requests left in the current window");
        }

        RateLimiter {
            state: Arc::new(Mutex::new(LimiterState {
                limit: config.default_limit,
                remaining: config.default_limit,
                reset_at: None,
            })),
            name: config.name,
            threshold: config.threshold,
            min_delay: config.min_delay,
            max_delay: config.max_delay,
            reset_buffer: config.reset_buffer,
            listeners: config.event_listeners,
        }
    }

    /// The name this limiter reports in events, metrics, and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pauses when the window is under pressure, then returns the delay
    /// that was applied.
    ///
    /// The sleep runs outside the state lock, so concurrent callers plan
    /// their own delays without serializing on each other's sleeps. The
    /// tracked state may drift while a caller sleeps; the next response's
    /// headers straighten it out.
    pub async fn acquire(&self) -> Duration {
        let state = self.state();
        let delay = self.delay_for(state);

        if delay > Duration::ZERO {
            #[cfg(feature = "metrics")]
            counter!("rate_limiter_waits_total", "limiter" => self.name.clone()).increment(1);
            #[cfg(feature = "tracing")]
            debug!(
                limiter = %self.name,
                delay_ms = delay.as_millis() as u64,
                remaining = state.remaining,
                "Throttling before request"
            );
            self.listeners.emit(&RateLimitEvent::Throttled {
                limiter: self.name.clone(),
                at: Instant::now(),
                delay,
                remaining: state.remaining,
            });
            tokio::time::sleep(delay).await;
        }

        delay
    }

    /// Computes the pause warranted by the given window state.
    fn delay_for(&self, state: LimiterState) -> Duration {
        // A window whose reset has comfortably passed is fresh again, no
        // matter how depleted the stale numbers look.
        if let Some(reset_at) = state.reset_at {
            if SystemTime::now() > reset_at + self.reset_buffer {
                return Duration::ZERO;
            }
        }

        if state.limit == 0 {
            return Duration::ZERO;
        }
        let remaining_fraction = state.remaining as f64 / state.limit as f64;
        if remaining_fraction > self.threshold {
            return Duration::ZERO;
        }

        // How deep into the danger zone we are: 0 right at the threshold,
        // 1 with nothing left.
        let ratio = 1.0 - remaining_fraction / self.threshold;
        self.min_delay + (self.max_delay - self.min_delay).mul_f64(ratio)
    }

    /// Folds a response's rate limit headers into the tracked window.
    ///
    /// Both the legacy `X-RateLimit-*` family and the IETF draft
    /// `RateLimit-*` family are understood; when a response carries both,
    /// the IETF values win. Malformed or absent values leave the prior
    /// state untouched.
    pub fn update_from_response(&self, headers: &HeaderMap) {
        let legacy = headers::legacy(headers);
        let ietf = headers::ietf(headers);
        if legacy.is_empty() && ietf.is_empty() {
            return;
        }

        let (limit, remaining) = {
            let mut state = self.state.lock().unwrap();
            for snapshot in [legacy, ietf] {
                if let Some(limit) = snapshot.limit {
                    state.limit = limit;
                }
                if let Some(remaining) = snapshot.remaining {
                    state.remaining = remaining;
                }
                if let Some(reset_at) = snapshot.reset_at {
                    state.reset_at = Some(reset_at);
                }
            }
            (state.limit, state.remaining)
        };

        #[cfg(feature = "metrics")]
        {
            gauge!("rate_limiter_limit", "limiter" => self.name.clone()).set(limit as f64);
            gauge!("rate_limiter_remaining", "limiter" => self.name.clone()).set(remaining as f64);
        }
        #[cfg(feature = "tracing")]
        debug!(limiter = %self.name, limit, remaining, "Rate limit window updated");
        self.listeners.emit(&RateLimitEvent::Updated {
            limiter: self.name.clone(),
            at: Instant::now(),
            limit,
            remaining,
        });
    }

    /// Decides whether a rate-limited request is worth retrying.
    ///
    /// Only a 429 qualifies. When the response carries a parseable
    /// `Retry-After`, the declared wait must not exceed
    /// [`RETRY_AFTER_CEILING`]; a server asking for longer is telling the
    /// caller to come back later, not to retry. A missing or unparseable
    /// header still advises a retry.
    pub fn should_retry(&self, status: StatusCode, headers: &HeaderMap) -> bool {
        if status != StatusCode::TOO_MANY_REQUESTS {
            return false;
        }
        match retry_after_seconds(headers) {
            Some(wait) => wait <= RETRY_AFTER_CEILING,
            None => true,
        }
    }

    /// How long to pause before retrying a 429: the response's
    /// `Retry-After` when it parses, otherwise the configured maximum
    /// delay.
    pub fn retry_delay(&self, headers: &HeaderMap) -> Duration {
        retry_after_seconds(headers).unwrap_or(self.max_delay)
    }

    /// Snapshot of the tracked window.
    pub fn state(&self) -> LimiterState {
        *self.state.lock().unwrap()
    }

    /// Remaining quota as a percentage of the tracked window.
    pub fn remaining_percent(&self) -> f64 {
        self.state().remaining_percent()
    }
}

fn retry_after_seconds(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Point-in-time view of the tracked rate limit window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterState {
    /// Window size the server last reported, or the configured default.
    pub limit: u32,
    /// Requests the server last reported remaining.
    pub remaining: u32,
    /// When the window resets, if the server has said.
    pub reset_at: Option<SystemTime>,
}

impl LimiterState {
    /// Remaining quota as a percentage of the window, clamped to 0..=100.
    /// An untracked window (limit 0) reports 100.
    pub fn remaining_percent(&self) -> f64 {
        if self.limit == 0 {
            return 100.0;
        }
        ((self.remaining as f64 / self.limit as f64) * 100.0).clamp(0.0, 100.0)
    }
}
