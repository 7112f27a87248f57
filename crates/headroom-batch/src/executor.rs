//! Bounded-concurrency batch execution.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter};
#[cfg(feature = "tracing")]
use tracing::debug;

use headroom_core::{BoxError, EventListeners};

use crate::config::BatchConfig;
use crate::error::{BatchFailure, TaskError};
use crate::events::BatchEvent;

/// One keyed unit of work in a batch.
pub struct BatchOperation<T> {
    pub(crate) key: String,
    pub(crate) work: BoxFuture<'static, Result<T, BoxError>>,
}

impl<T> BatchOperation<T> {
    /// Wraps a future as a batch operation identified by `key`. The key
    /// comes back in failure reports, so use something an operator can act
    /// on, like the id of the record being synced.
    pub fn new<F>(key: impl Into<String>, work: F) -> Self
    where
        F: Future<Output = Result<T, BoxError>> + Send + 'static,
    {
        BatchOperation {
            key: key.into(),
            work: work.boxed(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// What happened to a submitted batch.
#[derive(Debug)]
pub struct BatchOutcome<T> {
    /// Results aligned with submission order; `None` where the operation
    /// produced no value.
    pub results: Vec<Option<T>>,
    /// Failures sorted by submission index.
    pub failures: Vec<BatchFailure>,
    /// Wall time for the whole batch.
    pub duration: Duration,
}

impl<T> BatchOutcome<T> {
    /// `true` when every operation produced a value.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|result| result.is_some()).count()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// The successful values, dropping empty slots.
    pub fn successes(self) -> Vec<T> {
        self.results.into_iter().flatten().collect()
    }
}

/// Runs batches of independent operations with a concurrency ceiling.
///
/// The ceiling is what keeps a batch from stampeding a rate-limited API:
/// at most `concurrency` operations run at once, the rest queue. With
/// `stop_on_error` set, the first failure cancels everything still
/// queued; operations already in flight always finish on their own, since
/// half-done API writes are worse than a few extra reads.
///
/// Cloning is cheap; clones share nothing but configuration.
#[derive(Clone)]
pub struct BatchExecutor {
    name: String,
    concurrency: usize,
    stop_on_error: bool,
    listeners: EventListeners<BatchEvent>,
}

impl BatchExecutor {
    /// Creates an executor from the given configuration.
    pub fn new(config: BatchConfig) -> Self {
        #[cfg(feature = "metrics")]
        describe_counter!("batch_items_total", "Batch operations by result");

        BatchExecutor {
            name: config.name,
            concurrency: config.concurrency,
            stop_on_error: config.stop_on_error,
            listeners: config.event_listeners,
        }
    }

    /// The name this executor reports in events, metrics, and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `operations` and reports every result and failure.
    ///
    /// Results keep submission order regardless of completion order. The
    /// token stops the batch between operations: already-running work is
    /// never interrupted, but nothing new is admitted after it fires.
    pub async fn run<T>(
        &self,
        cancel: &CancellationToken,
        operations: Vec<BatchOperation<T>>,
    ) -> BatchOutcome<T>
    where
        T: Send + 'static,
    {
        let started = Instant::now();
        let total = operations.len();

        #[cfg(feature = "tracing")]
        debug!(batch = %self.name, operations = total, "Batch started");
        self.listeners.emit(&BatchEvent::Started {
            batch: self.name.clone(),
            at: Instant::now(),
            operations: total,
        });

        let outcome = if total == 0 {
            BatchOutcome {
                results: Vec::new(),
                failures: Vec::new(),
                duration: started.elapsed(),
            }
        } else if self.concurrency <= 1 {
            self.run_sequential(cancel, operations, started).await
        } else {
            self.run_concurrent(cancel, operations, started).await
        };

        #[cfg(feature = "metrics")]
        {
            counter!("batch_items_total", "batch" => self.name.clone(), "result" => "ok")
                .increment(outcome.succeeded() as u64);
            counter!("batch_items_total", "batch" => self.name.clone(), "result" => "failed")
                .increment(outcome.failures.len() as u64);
        }
        #[cfg(feature = "tracing")]
        debug!(
            batch = %self.name,
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            "Batch completed"
        );
        self.listeners.emit(&BatchEvent::Completed {
            batch: self.name.clone(),
            at: Instant::now(),
            succeeded: outcome.succeeded(),
            failed: outcome.failed(),
            duration: outcome.duration,
        });

        outcome
    }

    /// Runs one operation per key, building the batch from `op`.
    ///
    /// A convenience over [`run`](Self::run) for the common case where the
    /// work is the same call applied to a list of ids: the closure receives
    /// each key and the key comes back in that slot's failure report.
    pub async fn run_with_keys<T, K, I, F, Fut>(
        &self,
        cancel: &CancellationToken,
        keys: I,
        mut op: F,
    ) -> BatchOutcome<T>
    where
        T: Send + 'static,
        I: IntoIterator<Item = K>,
        K: Into<String>,
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
    {
        let operations = keys
            .into_iter()
            .map(|key| {
                let key = key.into();
                let work = op(key.clone());
                BatchOperation::new(key, work)
            })
            .collect();
        self.run(cancel, operations).await
    }

    async fn run_sequential<T>(
        &self,
        cancel: &CancellationToken,
        operations: Vec<BatchOperation<T>>,
        started: Instant,
    ) -> BatchOutcome<T> {
        let total = operations.len();
        let mut results: Vec<Option<T>> = Vec::new();
        results.resize_with(total, || None);
        let mut failures = Vec::new();

        for (index, op) in operations.into_iter().enumerate() {
            let BatchOperation { key, work } = op;
            if cancel.is_cancelled() {
                // One marker for the operation that saw the cancellation;
                // later slots simply stay empty.
                self.record_failure(&mut failures, index, key, TaskError::Cancelled);
                break;
            }
            match work.await {
                Ok(value) => results[index] = Some(value),
                Err(source) => {
                    self.record_failure(&mut failures, index, key, TaskError::Failed(source));
                    if self.stop_on_error {
                        break;
                    }
                }
            }
        }

        BatchOutcome {
            results,
            failures,
            duration: started.elapsed(),
        }
    }

    async fn run_concurrent<T>(
        &self,
        cancel: &CancellationToken,
        operations: Vec<BatchOperation<T>>,
        started: Instant,
    ) -> BatchOutcome<T>
    where
        T: Send + 'static,
    {
        let total = operations.len();
        let keys: Vec<String> = operations.iter().map(|op| op.key.clone()).collect();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let child = cancel.child_token();
        let (tx, mut rx) = mpsc::channel::<(usize, Result<T, TaskError>)>(total);

        for (index, op) in operations.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let child = child.clone();
            let tx = tx.clone();
            let stop_on_error = self.stop_on_error;
            tokio::spawn(async move {
                let BatchOperation { work, .. } = op;
                // Admission gate: cancellation beats a free permit, so a
                // stopped batch admits nothing more even when both are
                // ready at once.
                let permit = tokio::select! {
                    biased;
                    _ = child.cancelled() => {
                        let _ = tx.send((index, Err(TaskError::Cancelled))).await;
                        return;
                    }
                    permit = semaphore.acquire_owned() => permit,
                };
                let Ok(_permit) = permit else {
                    let _ = tx.send((index, Err(TaskError::Cancelled))).await;
                    return;
                };

                let result = work.await;
                if result.is_err() && stop_on_error {
                    child.cancel();
                }
                let _ = tx.send((index, result.map_err(TaskError::Failed))).await;
            });
        }
        drop(tx);

        let mut results: Vec<Option<T>> = Vec::new();
        results.resize_with(total, || None);
        let mut failures = Vec::new();
        let mut reported = vec![false; total];

        while let Some((index, result)) = rx.recv().await {
            reported[index] = true;
            match result {
                Ok(value) => results[index] = Some(value),
                Err(error) => {
                    let key = keys[index].clone();
                    self.record_failure(&mut failures, index, key, error);
                }
            }
        }

        // A slot nobody reported means the operation's task panicked.
        for (index, reported) in reported.iter().enumerate() {
            if !reported {
                let key = keys[index].clone();
                self.record_failure(&mut failures, index, key, TaskError::Panicked);
            }
        }

        failures.sort_by_key(|failure| failure.index);
        BatchOutcome {
            results,
            failures,
            duration: started.elapsed(),
        }
    }

    fn record_failure(
        &self,
        failures: &mut Vec<BatchFailure>,
        index: usize,
        key: String,
        error: TaskError,
    ) {
        #[cfg(feature = "tracing")]
        debug!(batch = %self.name, index, key = %key, error = %error, "Batch operation failed");
        self.listeners.emit(&BatchEvent::ItemFailed {
            batch: self.name.clone(),
            at: Instant::now(),
            index,
            key: key.clone(),
        });
        failures.push(BatchFailure { index, key, error });
    }
}
