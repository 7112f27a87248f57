//! Composes component state into a [`HealthReport`].

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;

use headroom_cache::CacheStats;
use headroom_core::BoxError;
use headroom_ratelimit::RateLimiter;

use crate::report::{ComponentHealth, HealthReport, HealthStatus, RateLimitSummary};

type ProbeFn = Box<dyn Fn() -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;
type StatsFn = Box<dyn Fn() -> CacheStats + Send + Sync>;

/// Builds [`HealthReport`]s from whatever components it was given.
///
/// Everything is optional: an empty checker reports ok with no
/// components. A shallow check reads in-process state only, so liveness
/// polling never spends API quota; pass `deep = true` to also run the
/// configured live probe.
pub struct HealthChecker {
    version: String,
    degraded_remaining_percent: f64,
    probe_latency_ceiling: Duration,
    rate_limiter: Option<RateLimiter>,
    cache_stats: Option<StatsFn>,
    probe: Option<ProbeFn>,
}

impl HealthChecker {
    /// Creates a new builder with default settings.
    pub fn builder() -> HealthCheckerBuilder {
        HealthCheckerBuilder::new()
    }

    /// Runs the configured checks and assembles the report.
    ///
    /// The overall status is the worst of the per-component statuses:
    /// a low rate limit window or a slow probe degrades it, a failed
    /// probe takes it down.
    pub async fn check(&self, deep: bool) -> HealthReport {
        let started = Instant::now();
        let mut components = Vec::new();
        let mut rate_limit = None;
        let mut cache = None;

        if let Some(limiter) = &self.rate_limiter {
            let state = limiter.state();
            let percent = state.remaining_percent();
            let status = if percent < self.degraded_remaining_percent {
                HealthStatus::Degraded
            } else {
                HealthStatus::Ok
            };
            components.push(ComponentHealth {
                name: "rate_limiter".to_string(),
                status,
                message: Some(format!("{percent:.1}% of window remaining")),
                latency_ms: None,
            });
            rate_limit = Some(RateLimitSummary {
                limit: state.limit,
                remaining: state.remaining,
                remaining_percent: percent,
                reset_at: state.reset_at.map(DateTime::<Utc>::from),
            });
        }

        if let Some(stats_fn) = &self.cache_stats {
            let stats = stats_fn();
            components.push(ComponentHealth {
                name: "cache".to_string(),
                status: HealthStatus::Ok,
                message: Some(format!("{}/{} entries", stats.size, stats.max_entries)),
                latency_ms: None,
            });
            cache = Some(stats);
        }

        if deep {
            if let Some(probe) = &self.probe {
                components.push(self.run_probe(probe).await);
            }
        }

        let status = components
            .iter()
            .map(|component| component.status)
            .max()
            .unwrap_or(HealthStatus::Ok);

        HealthReport {
            status,
            version: self.version.clone(),
            timestamp: Utc::now(),
            components,
            rate_limit,
            cache,
            response_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    async fn run_probe(&self, probe: &ProbeFn) -> ComponentHealth {
        let started = Instant::now();
        let result = probe().await;
        let latency = started.elapsed();
        let latency_ms = latency.as_millis() as u64;

        let (status, message) = match result {
            Ok(()) if latency > self.probe_latency_ceiling => (
                HealthStatus::Degraded,
                Some(format!("probe took {latency_ms}ms")),
            ),
            Ok(()) => (HealthStatus::Ok, None),
            Err(error) => (HealthStatus::Down, Some(error.to_string())),
        };

        ComponentHealth {
            name: "api".to_string(),
            status,
            message,
            latency_ms: Some(latency_ms),
        }
    }
}

impl fmt::Debug for HealthChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthChecker")
            .field("version", &self.version)
            .field(
                "degraded_remaining_percent",
                &self.degraded_remaining_percent,
            )
            .field("probe_latency_ceiling", &self.probe_latency_ceiling)
            .field("rate_limiter", &self.rate_limiter.is_some())
            .field("cache_stats", &self.cache_stats.is_some())
            .field("probe", &self.probe.is_some())
            .finish()
    }
}

/// Builder for [`HealthChecker`].
pub struct HealthCheckerBuilder {
    version: String,
    degraded_remaining_percent: f64,
    probe_latency_ceiling: Duration,
    rate_limiter: Option<RateLimiter>,
    cache_stats: Option<StatsFn>,
    probe: Option<ProbeFn>,
}

impl HealthCheckerBuilder {
    /// Creates a builder with the default settings:
    ///
    /// - `version`: this crate's version
    /// - `degraded_remaining_percent`: 10.0
    /// - `probe_latency_ceiling`: 5 seconds
    pub fn new() -> Self {
        HealthCheckerBuilder {
            version: env!("CARGO_PKG_VERSION").to_string(),
            degraded_remaining_percent: 10.0,
            probe_latency_ceiling: Duration::from_secs(5),
            rate_limiter: None,
            cache_stats: None,
            probe: None,
        }
    }

    /// Sets the version string the report carries. Applications usually
    /// put their own version here rather than this crate's.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Reports the rate limiter as degraded once its remaining quota
    /// falls below this percentage.
    pub fn degraded_remaining_percent(mut self, percent: f64) -> Self {
        self.degraded_remaining_percent = percent;
        self
    }

    /// Probe latency above this ceiling reports the API as degraded.
    pub fn probe_latency_ceiling(mut self, ceiling: Duration) -> Self {
        self.probe_latency_ceiling = ceiling;
        self
    }

    /// Monitors the given limiter's window. Limiter clones share state,
    /// so pass a clone of the one the client actually uses.
    pub fn rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Monitors cache occupancy through the given stats source.
    pub fn cache_stats<F>(mut self, stats: F) -> Self
    where
        F: Fn() -> CacheStats + Send + Sync + 'static,
    {
        self.cache_stats = Some(Box::new(stats));
        self
    }

    /// Sets the live probe that deep checks run. Keep it cheap: it hits
    /// the real API and counts against the quota.
    pub fn probe<F, Fut>(mut self, probe: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.probe = Some(Box::new(move || probe().boxed()));
        self
    }

    /// Builds the checker.
    ///
    /// # Panics
    ///
    /// Panics if `degraded_remaining_percent` is outside 0 to 100.
    pub fn build(self) -> HealthChecker {
        assert!(
            (0.0..=100.0).contains(&self.degraded_remaining_percent),
            "degraded_remaining_percent must be between 0 and 100"
        );
        HealthChecker {
            version: self.version,
            degraded_remaining_percent: self.degraded_remaining_percent,
            probe_latency_ceiling: self.probe_latency_ceiling,
            rate_limiter: self.rate_limiter,
            cache_stats: self.cache_stats,
            probe: self.probe,
        }
    }
}

impl Default for HealthCheckerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
