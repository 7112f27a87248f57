//! Batch, pagination, and pipeline flows over the stub API.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use headroom_batch::{
    BatchConfig, BatchExecutor, BatchOperation, Page, Paginator, Pipeline, TaskError,
};
use headroom_core::BoxError;
use headroom_ratelimit::{RateLimiter, RateLimiterConfig};
use headroom_retry::{RetryConfig, Retryer};

use super::client::{StubApi, fetch_plan};

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
async fn batch_fans_out_through_the_limiter() {
    let api = Arc::new(StubApi::new(100));
    let limiter = quick_limiter();
    let executor = BatchExecutor::new(
        BatchConfig::builder()
            .name("plan-sync")
            .concurrency(3)
            .build(),
    );

    let ops: Vec<BatchOperation<String>> = (0..6)
        .map(|i| {
            let api = Arc::clone(&api);
            let limiter = limiter.clone();
            BatchOperation::new(format!("plan-{i}"), async move {
                fetch_plan(&api, &limiter, &i.to_string()).await
            })
        })
        .collect();

    let outcome = executor.run(&CancellationToken::new(), ops).await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.results.len(), 6);
    assert_eq!(api.requests(), 6);
    assert_eq!(limiter.state().remaining, 94);
}

#[tokio::test]
async fn batch_reports_the_failed_key() {
    let api = Arc::new(StubApi::new(100));
    let limiter = quick_limiter();
    let executor = BatchExecutor::new(
        BatchConfig::builder()
            .name("plan-sync")
            .concurrency(1)
            .build(),
    );

    let mut ops = Vec::new();
    for i in 0..3 {
        let api = Arc::clone(&api);
        let limiter = limiter.clone();
        ops.push(BatchOperation::new(format!("plan-{i}"), async move {
            // The middle request hits a window where the stub is failing.
            if i == 1 {
                api.fail_next(1);
            }
            fetch_plan(&api, &limiter, &i.to_string()).await
        }));
    }

    let outcome = executor.run(&CancellationToken::new(), ops).await;

    assert_eq!(outcome.succeeded(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].key, "plan-1");
    assert!(matches!(outcome.failures[0].error, TaskError::Failed(_)));
}

#[tokio::test(start_paused = true)]
async fn paginated_listing_retries_flaky_pages() {
    let api = Arc::new(StubApi::new(100));
    let limiter = quick_limiter();
    let retryer = Retryer::new(
        RetryConfig::builder()
            .max_attempts(3)
            .jitter(0.0)
            .build(),
    );
    let cancel = CancellationToken::new();

    // Three pages of ids; page 2 fails once before the retryer gets it
    // through.
    let result = Paginator::new("plans")
        .page_size(10)
        .fetch_all(&cancel, |page, size| {
            if page == 2 {
                api.fail_next(1);
            }
            let api = &api;
            let limiter = &limiter;
            let retryer = &retryer;
            let cancel = &cancel;
            async move {
                let id = format!("page-{page}");
                retryer
                    .run_auto(cancel, || fetch_plan(api, limiter, &id))
                    .await
                    .map_err(|error| match error.into_source() {
                        Some(source) => source,
                        None => Box::new(std::io::Error::other("cancelled")) as BoxError,
                    })?;
                let start = (page - 1) * size;
                let items: Vec<u32> = (start..(start + size).min(25)).collect();
                Ok(Page {
                    items,
                    has_more: start + size < 25,
                })
            }
        })
        .await;

    assert!(result.is_complete(), "error: {:?}", result.error);
    assert_eq!(result.pages_fetched, 3);
    assert_eq!(result.items.len(), 25);
    // Two clean pages, one retried page.
    assert_eq!(api.requests(), 4);
}

#[tokio::test]
async fn pipeline_threads_a_value_through_api_steps() {
    let api = Arc::new(StubApi::new(100));
    let limiter = quick_limiter();

    let fetch_api = Arc::clone(&api);
    let fetch_limiter = limiter.clone();
    let enrich_api = Arc::clone(&api);
    let enrich_limiter = limiter.clone();

    let pipeline = Pipeline::new("plan-enrichment")
        .step("fetch", move |id: String| {
            let api = Arc::clone(&fetch_api);
            let limiter = fetch_limiter.clone();
            async move { fetch_plan(&api, &limiter, &id).await }
        })
        .step("enrich", move |body: String| {
            let api = Arc::clone(&enrich_api);
            let limiter = enrich_limiter.clone();
            async move {
                let extra = fetch_plan(&api, &limiter, "extra").await?;
                Ok(format!("{body}+{extra}"))
            }
        });

    let enriched = pipeline
        .run(&CancellationToken::new(), "9".to_string())
        .await
        .unwrap();

    assert!(enriched.contains("Plan 9"));
    assert!(enriched.contains("Plan extra"));
    assert_eq!(api.requests(), 2);
}
