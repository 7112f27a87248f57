//! Multi-step transformation pipelines with checkpoint recovery.

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

#[cfg(feature = "tracing")]
use tracing::debug;

use headroom_core::BoxError;

/// Why a pipeline run stopped early.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A step returned an error.
    #[error("step '{step}' (index {index}) failed: {source}")]
    Step {
        step: String,
        index: usize,
        #[source]
        source: BoxError,
    },
    /// The caller's token fired before this step ran.
    #[error("cancelled before step '{step}' (index {index})")]
    Cancelled { step: String, index: usize },
}

/// A failed pipeline run, carrying the last good value.
///
/// `last_value` is the output of the last step that completed, so a caller
/// can resume from the checkpoint instead of redoing everything.
#[derive(Debug)]
pub struct PipelineFailure<T> {
    pub last_value: T,
    pub error: PipelineError,
}

struct Step<T> {
    name: String,
    run: Box<dyn Fn(T) -> BoxFuture<'static, Result<T, BoxError>> + Send + Sync>,
}

/// Chains value transformations where each step may call the API.
///
/// Steps run in the order they were added, each receiving the previous
/// step's output. The value type must be `Clone` so a failure can report
/// the pre-step checkpoint without consuming it.
pub struct Pipeline<T> {
    name: String,
    steps: Vec<Step<T>>,
}

impl<T> Pipeline<T>
where
    T: Clone + Send + 'static,
{
    /// Creates an empty pipeline. Running it returns the input unchanged.
    pub fn new(name: impl Into<String>) -> Self {
        Pipeline {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a named step.
    pub fn step<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
    {
        self.steps.push(Step {
            name: name.into(),
            run: Box::new(move |value| f(value).boxed()),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step in order, threading the value through.
    ///
    /// On failure the returned [`PipelineFailure`] holds the output of the
    /// last completed step. Cancellation is checked between steps; a step
    /// already running finishes on its own.
    pub async fn run(&self, cancel: &CancellationToken, input: T) -> Result<T, PipelineFailure<T>> {
        let mut current = input;

        for (index, step) in self.steps.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(PipelineFailure {
                    last_value: current,
                    error: PipelineError::Cancelled {
                        step: step.name.clone(),
                        index,
                    },
                });
            }

            let checkpoint = current.clone();
            match (step.run)(current).await {
                Ok(next) => {
                    #[cfg(feature = "tracing")]
                    debug!(pipeline = %self.name, step = %step.name, index, "Step completed");
                    current = next;
                }
                Err(source) => {
                    #[cfg(feature = "tracing")]
                    debug!(pipeline = %self.name, step = %step.name, index, "Step failed");
                    return Err(PipelineFailure {
                        last_value: checkpoint,
                        error: PipelineError::Step {
                            step: step.name.clone(),
                            index,
                            source,
                        },
                    });
                }
            }
        }

        Ok(current)
    }
}

impl<T> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field(
                "steps",
                &self.steps.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
