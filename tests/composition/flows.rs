//! Cache, limiter, retry, and health wired together around the stub.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use headroom_cache::{Cache, CacheConfig, cache_key};
use headroom_health::{HealthChecker, HealthStatus};
use headroom_ratelimit::{RateLimiter, RateLimiterConfig};
use headroom_retry::{RetryConfig, Retryer};

use super::client::{StubApi, fetch_plan};

/// Limiter with millisecond-scale delays so throttled tests stay fast.
fn quick_limiter() -> RateLimiter {
    RateLimiter::new(
        RateLimiterConfig::builder()
            .name("stub")
            .min_delay(Duration::from_millis(1))
            .max_delay(Duration::from_millis(5))
            .build(),
    )
}

#[tokio::test]
async fn cached_reads_spend_no_quota() {
    let api = StubApi::new(100);
    let limiter = quick_limiter();
    let cache: Cache<String> = Cache::new(CacheConfig::builder().name("plans").build());

    let key = cache_key("plans", ["42"]);
    let body = match cache.get(&key) {
        Some(hit) => hit,
        None => {
            let fetched = fetch_plan(&api, &limiter, "42").await.unwrap();
            cache.put(key.clone(), fetched.clone());
            fetched
        }
    };
    assert!(body.contains(r#""id":"42""#));
    assert_eq!(api.requests(), 1);

    // The second read never leaves the process.
    let again = cache.get(&key).expect("cached body");
    assert_eq!(again, body);
    assert_eq!(api.requests(), 1);
    assert_eq!(limiter.state().remaining, 99);
}

#[tokio::test]
async fn limiter_tracks_the_server_window() {
    let api = StubApi::new(50);
    let limiter = quick_limiter();

    for id in ["1", "2", "3"] {
        fetch_plan(&api, &limiter, id).await.unwrap();
    }

    let state = limiter.state();
    assert_eq!(state.limit, 50);
    assert_eq!(state.remaining, 47);
}

#[tokio::test]
async fn depleted_window_throttles_the_client() {
    let api = StubApi::new(10);
    let limiter = quick_limiter();

    for i in 0..9 {
        fetch_plan(&api, &limiter, &i.to_string()).await.unwrap();
    }

    // One request left of ten; threshold is 20%, so the next acquire
    // waits partway between min_delay and max_delay.
    let waited = limiter.acquire().await;
    assert_eq!(waited, Duration::from_millis(3));
}

#[tokio::test(start_paused = true)]
async fn retry_rides_out_transient_failures() {
    let api = StubApi::new(100);
    api.fail_next(2);
    let limiter = quick_limiter();
    let retryer = Retryer::new(
        RetryConfig::builder()
            .name("stub")
            .max_attempts(4)
            .jitter(0.0)
            .build(),
    );

    let outcome = retryer
        .run_auto(&CancellationToken::new(), || {
            fetch_plan(&api, &limiter, "7")
        })
        .await
        .unwrap();

    assert!(outcome.value.contains("Plan 7"));
    assert_eq!(outcome.attempts, 3);
    assert_eq!(api.requests(), 3);
}

#[tokio::test(start_paused = true)]
async fn sync_flow_combines_cache_retry_and_limiter() {
    let api = Arc::new(StubApi::new(100));
    let limiter = quick_limiter();
    let cache: Cache<String> = Cache::new(CacheConfig::builder().name("plans").build());
    let retryer = Retryer::new(RetryConfig::builder().max_attempts(3).build());
    let cancel = CancellationToken::new();

    // The first fetch hiccups once.
    api.fail_next(1);

    for id in ["1", "2", "1", "3", "2"] {
        let key = cache_key("plans", [id]);
        if cache.get(&key).is_some() {
            continue;
        }
        let body = retryer
            .run_auto(&cancel, || fetch_plan(&api, &limiter, id))
            .await
            .unwrap()
            .into_value();
        cache.put(key, body);
    }

    // Three distinct ids, plus one retried failure.
    assert_eq!(api.requests(), 4);
    assert_eq!(cache.len(), 3);
    assert_eq!(limiter.state().remaining, 96);
}

#[tokio::test]
async fn health_reflects_the_composed_state() {
    let api = StubApi::new(100);
    let limiter = quick_limiter();
    let cache: Cache<String> = Cache::new(CacheConfig::builder().name("plans").build());

    for id in ["1", "2"] {
        let body = fetch_plan(&api, &limiter, id).await.unwrap();
        cache.put(cache_key("plans", [id]), body);
    }

    let stats_cache = cache.clone();
    let checker = HealthChecker::builder()
        .version("0.0.0-test")
        .rate_limiter(limiter.clone())
        .cache_stats(move || stats_cache.stats())
        .build();

    let report = checker.check(false).await;

    assert_eq!(report.status, HealthStatus::Ok);
    assert_eq!(report.components.len(), 2);
    let summary = report.rate_limit.as_ref().expect("limiter tracked");
    assert_eq!(summary.limit, 100);
    assert_eq!(summary.remaining, 98);
    assert_eq!(report.cache.as_ref().expect("cache tracked").size, 2);
}
