//! Retryer stress tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use headroom_core::{ApiError, BoxError};
use headroom_retry::{RetryConfig, Retryer};
use http::StatusCode;
use tokio_util::sync::CancellationToken;

/// Test: 100k first-try successes pay nothing for the retry wrapper.
#[tokio::test]
#[ignore]
async fn stress_hundred_thousand_first_try_successes() {
    let retryer = Retryer::new(RetryConfig::builder().name("stress").build());
    let cancel = CancellationToken::new();

    let start = Instant::now();
    for i in 0..100_000u32 {
        let result = retryer
            .run_auto(&cancel, || async move { Ok::<_, BoxError>(i) })
            .await;
        assert!(result.is_ok());
    }
    let elapsed = start.elapsed();

    println!("100k wrapped calls in {elapsed:?}");
    println!(
        "Throughput: {:.0} calls/sec",
        100_000.0 / elapsed.as_secs_f64()
    );
}

/// Test: 100 tasks running cloned retryers interfere with nothing.
#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn stress_concurrent_retryers_share_nothing() {
    let retryer = Retryer::new(RetryConfig::builder().name("stress").build());
    let successes = Arc::new(AtomicU32::new(0));

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let retryer = retryer.clone();
            let successes = Arc::clone(&successes);
            tokio::spawn(async move {
                let cancel = CancellationToken::new();
                for i in 0..1_000u32 {
                    let result = retryer
                        .run_auto(&cancel, || async move { Ok::<_, BoxError>(i) })
                        .await;
                    if result.is_ok() {
                        successes.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(successes.load(Ordering::Relaxed), 100_000);
}

/// Test: 10k flaky operations account for every scheduled retry.
///
/// Runs under a paused clock so the 10k backoff sleeps cost no wall
/// time.
#[tokio::test(start_paused = true)]
#[ignore]
async fn stress_ten_thousand_flaky_operations() {
    let retries = Arc::new(AtomicU32::new(0));
    let retries2 = Arc::clone(&retries);
    let retryer = Retryer::new(
        RetryConfig::builder()
            .name("stress")
            .jitter(0.0)
            .base_delay(Duration::from_millis(1))
            .on_retry(move |_, _| {
                retries2.fetch_add(1, Ordering::Relaxed);
            })
            .build(),
    );
    let cancel = CancellationToken::new();

    for _ in 0..10_000u32 {
        let calls = AtomicU32::new(0);
        let result = retryer
            .run_auto(&cancel, || async {
                if calls.fetch_add(1, Ordering::Relaxed) == 0 {
                    Err(Box::new(ApiError::new(
                        StatusCode::SERVICE_UNAVAILABLE,
                        "blip",
                    )) as BoxError)
                } else {
                    Ok(())
                }
            })
            .await;
        assert!(result.is_ok());
    }

    assert_eq!(retries.load(Ordering::Relaxed), 10_000);
}
