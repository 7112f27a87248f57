//! Report types produced by the health checker.

use chrono::{DateTime, Utc};
use serde::Serialize;

use headroom_cache::CacheStats;

/// Health level of a component or of the system as a whole.
///
/// Ordered by severity, so the worst of a set is its `max()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Working normally.
    Ok,
    /// Working, but under pressure or slower than it should be.
    Degraded,
    /// Not working.
    Down,
}

impl HealthStatus {
    /// `true` unless the status is [`Down`](HealthStatus::Down).
    pub fn is_usable(&self) -> bool {
        matches!(self, HealthStatus::Ok | HealthStatus::Degraded)
    }
}

/// Health of one monitored component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Wall time the component's check took, when one actually ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Rate limit window snapshot carried in a report.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitSummary {
    pub limit: u32,
    pub remaining: u32,
    pub remaining_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_at: Option<DateTime<Utc>>,
}

/// Snapshot of everything the checker watches, ready for a status
/// endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Worst status across all components.
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub components: Vec<ComponentHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
    /// Total check wall time in milliseconds.
    pub response_time_ms: u64,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Ok
    }

    /// The report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
