//! Property tests for the batch executor.
//!
//! Invariants tested:
//! - Results stay aligned with submission order at any concurrency
//! - Success and failure counts account for every operation
//! - Failure reports carry exactly the failing indices

use proptest::prelude::*;
use std::collections::HashSet;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use headroom_batch::{BatchConfig, BatchExecutor, BatchOperation};
use headroom_core::BoxError;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: slot `i` of the outcome always belongs to operation `i`.
    #[test]
    fn results_stay_aligned_with_submission(
        n in 1usize..=24,
        concurrency in 1usize..=8,
    ) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let executor = BatchExecutor::new(
                BatchConfig::builder().concurrency(concurrency).build(),
            );
            let ops: Vec<BatchOperation<usize>> = (0..n)
                .map(|i| {
                    BatchOperation::new(format!("op-{i}"), async move {
                        tokio::task::yield_now().await;
                        Ok(i)
                    })
                })
                .collect();

            let outcome = executor.run(&CancellationToken::new(), ops).await;
            prop_assert!(outcome.is_complete());
            for (i, slot) in outcome.results.iter().enumerate() {
                prop_assert_eq!(*slot, Some(i), "slot {} out of order", i);
            }
            Ok(())
        })?;
    }

    /// Property: every operation shows up as exactly one success or one
    /// failure, and the failure indices are exactly the induced ones.
    #[test]
    fn accounting_covers_every_operation(
        n in 1usize..=24,
        concurrency in 1usize..=8,
        induced in prop::collection::hash_set(0usize..24, 0..=8),
    ) {
        let induced: HashSet<usize> = induced.into_iter().filter(|i| *i < n).collect();
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let executor = BatchExecutor::new(
                BatchConfig::builder().concurrency(concurrency).build(),
            );
            let ops: Vec<BatchOperation<usize>> = (0..n)
                .map(|i| {
                    let fails = induced.contains(&i);
                    BatchOperation::new(format!("op-{i}"), async move {
                        if fails {
                            Err(Box::new(std::io::Error::other("induced")) as BoxError)
                        } else {
                            Ok(i)
                        }
                    })
                })
                .collect();

            let outcome = executor.run(&CancellationToken::new(), ops).await;
            prop_assert_eq!(outcome.succeeded() + outcome.failed(), n);
            let reported: HashSet<usize> =
                outcome.failures.iter().map(|failure| failure.index).collect();
            prop_assert_eq!(&reported, &induced);
            Ok(())
        })?;
    }
}
