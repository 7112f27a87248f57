//! Backoff delay computation.

use std::time::Duration;

use rand::Rng;

/// Exponential backoff with proportional jitter and a hard cap.
///
/// The delay before attempt `n + 1` starts at `base` for the first retry
/// and multiplies by `multiplier` for each one after that. Jitter then
/// scatters the result by up to `jitter * delay` in either direction, so a
/// herd of clients that failed together does not retry together. The
/// jittered delay is finally capped at `max`.
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    base: Duration,
    max: Duration,
    multiplier: f64,
    jitter: f64,
}

impl BackoffSchedule {
    pub fn new(base: Duration, max: Duration, multiplier: f64, jitter: f64) -> Self {
        BackoffSchedule {
            base,
            max,
            multiplier,
            jitter,
        }
    }

    /// The delay to sleep after a failure of attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.max(1) - 1;
        let raw = self.base.mul_f64(self.multiplier.powi(exponent as i32));

        let jittered = if self.jitter > 0.0 {
            let swing: f64 = rand::rng().random_range(-1.0..=1.0);
            raw.mul_f64((1.0 + self.jitter * swing).max(0.0))
        } else {
            raw
        };

        jittered.min(self.max)
    }
}
