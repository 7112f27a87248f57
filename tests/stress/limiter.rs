//! Rate limiter stress tests.

use std::sync::Arc;
use std::time::Instant;

use headroom_ratelimit::{RateLimiter, RateLimiterConfig};
use http::HeaderMap;

fn window(limit: u32, remaining: u32) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", limit.to_string().parse().unwrap());
    headers.insert(
        "x-ratelimit-remaining",
        remaining.to_string().parse().unwrap(),
    );
    headers
}

/// Test: 200k acquires against a wide-open window never sleep.
#[tokio::test]
#[ignore]
async fn stress_wide_open_window_never_sleeps() {
    let limiter = RateLimiter::new(RateLimiterConfig::builder().name("stress").build());
    limiter.update_from_response(&window(1_000_000, 1_000_000));

    let start = Instant::now();
    for _ in 0..200_000 {
        let waited = limiter.acquire().await;
        assert!(waited.is_zero());
    }
    let elapsed = start.elapsed();

    println!("200k acquires in {elapsed:?}");
    println!(
        "Throughput: {:.0} acquires/sec",
        200_000.0 / elapsed.as_secs_f64()
    );
}

/// Test: 100 tasks hammering one window leave its state exactly as the
/// headers set it.
#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn stress_concurrent_acquires_share_one_window() {
    let limiter = Arc::new(RateLimiter::new(
        RateLimiterConfig::builder().name("stress").build(),
    ));
    limiter.update_from_response(&window(1_000_000, 1_000_000));

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move {
                for _ in 0..1_000 {
                    limiter.acquire().await;
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let state = limiter.state();
    println!("final remaining: {}", state.remaining);
    assert_eq!(state.limit, 1_000_000);
    assert_eq!(state.remaining, 1_000_000);
}

/// Test: header floods from many threads never corrupt the window.
#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn stress_header_floods_stay_consistent() {
    let limiter = Arc::new(RateLimiter::new(
        RateLimiterConfig::builder().name("stress").build(),
    ));

    let handles: Vec<_> = (0..8u32)
        .map(|thread| {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move {
                for i in 0..10_000u32 {
                    let remaining = (thread * 10_000 + i) % 500;
                    limiter.update_from_response(&window(500, remaining));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let state = limiter.state();
    assert_eq!(state.limit, 500);
    assert!(state.remaining < 500);
}
