//! Rate limit header parsing.
//!
//! Two header families are understood: the legacy `X-RateLimit-*` trio,
//! where `X-RateLimit-Reset` is an absolute Unix timestamp, and the IETF
//! draft `RateLimit-Limit` / `RateLimit-Remaining` pair.

use std::time::{Duration, SystemTime};

use http::HeaderMap;

pub(crate) const X_LIMIT: &str = "x-ratelimit-limit";
pub(crate) const X_REMAINING: &str = "x-ratelimit-remaining";
pub(crate) const X_RESET: &str = "x-ratelimit-reset";

pub(crate) const IETF_LIMIT: &str = "ratelimit-limit";
pub(crate) const IETF_REMAINING: &str = "ratelimit-remaining";

/// Values read from one header family. Fields are `None` when the header
/// is absent or unparseable.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct HeaderSnapshot {
    pub(crate) limit: Option<u32>,
    pub(crate) remaining: Option<u32>,
    pub(crate) reset_at: Option<SystemTime>,
}

impl HeaderSnapshot {
    pub(crate) fn is_empty(&self) -> bool {
        self.limit.is_none() && self.remaining.is_none() && self.reset_at.is_none()
    }
}

/// Reads the legacy `X-RateLimit-*` family.
pub(crate) fn legacy(headers: &HeaderMap) -> HeaderSnapshot {
    HeaderSnapshot {
        limit: number(headers, X_LIMIT),
        remaining: number(headers, X_REMAINING),
        reset_at: number::<u64>(headers, X_RESET)
            .map(|secs| SystemTime::UNIX_EPOCH + Duration::from_secs(secs)),
    }
}

/// Reads the IETF draft `RateLimit-*` family. The draft's reset field is
/// not consumed; only the legacy family moves the tracked reset time.
pub(crate) fn ietf(headers: &HeaderMap) -> HeaderSnapshot {
    HeaderSnapshot {
        limit: number(headers, IETF_LIMIT),
        remaining: number(headers, IETF_REMAINING),
        reset_at: None,
    }
}

fn number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
