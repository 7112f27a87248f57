//! The retry loop.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter};
#[cfg(feature = "tracing")]
use tracing::debug;

use headroom_core::{ApiError, BoxError, EventListeners, Retryable};

use crate::backoff::BackoffSchedule;
use crate::classify::TextClassifier;
use crate::config::RetryConfig;
use crate::error::{AttemptError, RetryError};
use crate::events::RetryEvent;

/// A successful retried operation, with a record of what it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome<T> {
    /// What the winning attempt returned.
    pub value: T,
    /// Attempts made, counting the successful one.
    pub attempts: u32,
    /// Time spent sleeping between attempts.
    pub total_delay: Duration,
}

impl<T> RetryOutcome<T> {
    /// The value, discarding the attempt bookkeeping.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Runs fallible async operations until one attempt succeeds, the attempt
/// budget runs out, a permanent error appears, or the caller cancels.
///
/// Between attempts the retryer sleeps according to its
/// [`BackoffSchedule`]: exponentially growing delays, scattered by jitter,
/// capped at the configured maximum.
///
/// Cloning is cheap; clones share nothing but configuration.
#[derive(Clone)]
pub struct Retryer {
    name: String,
    max_attempts: u32,
    schedule: BackoffSchedule,
    classifier: TextClassifier,
    listeners: EventListeners<RetryEvent>,
}

impl Retryer {
    /// Creates a retryer from the given configuration.
    pub fn new(config: RetryConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            describe_counter!(
                "retry_attempts_total",
                "Retries scheduled after transient errors"
            );
            describe_counter!(
                "retry_exhausted_total",
                "Operations that failed every allowed attempt"
            );
        }

        Retryer {
            schedule: BackoffSchedule::new(
                config.base_delay,
                config.max_delay,
                config.multiplier,
                config.jitter,
            ),
            name: config.name,
            max_attempts: config.max_attempts,
            classifier: config.classifier,
            listeners: config.event_listeners,
        }
    }

    /// The name this retryer reports in events, metrics, and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `work` until it succeeds or retrying stops making sense.
    ///
    /// `work` is called once per attempt and classifies its own failures
    /// via [`AttemptError`]: transient errors are retried after a backoff
    /// delay, permanent ones abort immediately. The token is checked
    /// before each attempt and interrupts backoff sleeps, so a cancelled
    /// caller never waits out a delay.
    ///
    /// Success comes wrapped in a [`RetryOutcome`] recording the attempts
    /// made and the time slept between them; the [`RetryError`] variants
    /// carry the same bookkeeping on failure.
    pub async fn run<T, E, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut work: F,
    ) -> Result<RetryOutcome<T>, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError<E>>>,
    {
        let mut total_delay = Duration::ZERO;
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                self.emit_cancelled(attempt);
                return Err(RetryError::Cancelled {
                    attempts: attempt,
                    total_delay,
                });
            }
            attempt += 1;

            match work().await {
                Ok(value) => {
                    self.emit_succeeded(attempt, total_delay);
                    return Ok(RetryOutcome {
                        value,
                        attempts: attempt,
                        total_delay,
                    });
                }
                Err(AttemptError::Permanent(source)) => {
                    self.emit_aborted(attempt);
                    return Err(RetryError::Aborted {
                        attempts: attempt,
                        source,
                    });
                }
                Err(AttemptError::Transient(source)) => {
                    if attempt >= self.max_attempts {
                        self.emit_exhausted(attempt, total_delay);
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            total_delay,
                            source,
                        });
                    }

                    let delay = self.schedule.delay_for(attempt);
                    self.emit_retry(attempt, delay);
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            self.emit_cancelled(attempt);
                            return Err(RetryError::Cancelled {
                                attempts: attempt,
                                total_delay,
                            });
                        }
                        _ = tokio::time::sleep(delay) => {
                            total_delay += delay;
                        }
                    }
                }
            }
        }
    }

    /// Runs `work` with automatic error classification.
    ///
    /// An error that downcasts to [`ApiError`] is classified by its status
    /// code. Anything else is classified by the configured
    /// [`TextClassifier`] scanning the error's message, which catches the
    /// transport errors that never got as far as an HTTP status.
    pub async fn run_auto<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut work: F,
    ) -> Result<RetryOutcome<T>, RetryError<BoxError>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BoxError>>,
    {
        let classifier = &self.classifier;
        self.run(cancel, move || {
            let fut = work();
            async move {
                fut.await.map_err(|error| {
                    let transient = match error.downcast_ref::<ApiError>() {
                        Some(api) => api.is_retryable(),
                        None => classifier.matches(&error.to_string()),
                    };
                    if transient {
                        AttemptError::Transient(error)
                    } else {
                        AttemptError::Permanent(error)
                    }
                })
            }
        })
        .await
    }

    fn emit_retry(&self, attempt: u32, delay: Duration) {
        #[cfg(feature = "metrics")]
        counter!("retry_attempts_total", "retryer" => self.name.clone()).increment(1);
        #[cfg(feature = "tracing")]
        debug!(
            retryer = %self.name,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Retrying after transient error"
        );
        self.listeners.emit(&RetryEvent::Retry {
            retryer: self.name.clone(),
            at: Instant::now(),
            attempt,
            delay,
        });
    }

    fn emit_succeeded(&self, attempts: u32, total_delay: Duration) {
        self.listeners.emit(&RetryEvent::Succeeded {
            retryer: self.name.clone(),
            at: Instant::now(),
            attempts,
            total_delay,
        });
    }

    fn emit_exhausted(&self, attempts: u32, total_delay: Duration) {
        #[cfg(feature = "metrics")]
        counter!("retry_exhausted_total", "retryer" => self.name.clone()).increment(1);
        #[cfg(feature = "tracing")]
        debug!(retryer = %self.name, attempts, "Retry budget exhausted");
        self.listeners.emit(&RetryEvent::Exhausted {
            retryer: self.name.clone(),
            at: Instant::now(),
            attempts,
            total_delay,
        });
    }

    fn emit_aborted(&self, attempt: u32) {
        #[cfg(feature = "tracing")]
        debug!(retryer = %self.name, attempt, "Permanent error, not retrying");
        self.listeners.emit(&RetryEvent::Aborted {
            retryer: self.name.clone(),
            at: Instant::now(),
            attempt,
        });
    }

    fn emit_cancelled(&self, attempt: u32) {
        self.listeners.emit(&RetryEvent::Cancelled {
            retryer: self.name.clone(),
            at: Instant::now(),
            attempt,
        });
    }
}
