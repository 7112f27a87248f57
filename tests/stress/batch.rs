//! Batch executor stress tests.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use headroom_batch::{BatchConfig, BatchExecutor, BatchOperation};

use super::ConcurrencyTracker;

/// Test: 10k operations under a concurrency ceiling of 64.
#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn stress_ten_thousand_operations_hold_the_ceiling() {
    let tracker = ConcurrencyTracker::new();
    let executor = BatchExecutor::new(
        BatchConfig::builder()
            .name("stress")
            .concurrency(64)
            .build(),
    );

    let ops: Vec<BatchOperation<usize>> = (0..10_000)
        .map(|i| {
            let tracker = Arc::clone(&tracker);
            BatchOperation::new(format!("op-{i}"), async move {
                tracker.enter();
                tokio::task::yield_now().await;
                tracker.exit();
                Ok(i)
            })
        })
        .collect();

    let start = Instant::now();
    let outcome = executor.run(&CancellationToken::new(), ops).await;
    let elapsed = start.elapsed();

    println!("10k operations completed in {elapsed:?}");
    println!(
        "Throughput: {:.0} ops/sec, peak concurrency: {}",
        10_000.0 / elapsed.as_secs_f64(),
        tracker.peak()
    );

    assert!(outcome.is_complete());
    assert_eq!(outcome.succeeded(), 10_000);
    assert!(tracker.peak() <= 64, "peak {}", tracker.peak());
}

/// Test: results stay index-aligned across 5k shuffled completions.
#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn stress_alignment_survives_shuffled_completions() {
    let executor = BatchExecutor::new(
        BatchConfig::builder()
            .name("stress")
            .concurrency(128)
            .build(),
    );

    let ops: Vec<BatchOperation<usize>> = (0..5_000)
        .map(|i| {
            BatchOperation::new(format!("op-{i}"), async move {
                // Uneven yield counts shuffle completion order.
                for _ in 0..(i % 7) {
                    tokio::task::yield_now().await;
                }
                Ok(i)
            })
        })
        .collect();

    let outcome = executor.run(&CancellationToken::new(), ops).await;

    assert!(outcome.is_complete());
    for (i, slot) in outcome.results.iter().enumerate() {
        assert_eq!(*slot, Some(i), "slot {i} out of order");
    }
}

/// Test: sequential batches of 100k trivial operations finish promptly.
#[tokio::test]
#[ignore]
async fn stress_hundred_thousand_sequential_operations() {
    let executor = BatchExecutor::new(
        BatchConfig::builder()
            .name("stress")
            .concurrency(1)
            .build(),
    );

    let ops: Vec<BatchOperation<usize>> = (0..100_000)
        .map(|i| BatchOperation::new(format!("op-{i}"), async move { Ok(i) }))
        .collect();

    let start = Instant::now();
    let outcome = executor.run(&CancellationToken::new(), ops).await;
    let elapsed = start.elapsed();

    println!("100k sequential operations in {elapsed:?}");
    assert_eq!(outcome.succeeded(), 100_000);
}
