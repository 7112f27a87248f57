//! Property tests for the backoff schedule.
//!
//! Invariants tested:
//! - The delay never exceeds the cap, jitter included
//! - Without jitter the schedule never shrinks between attempts
//! - Jitter stays inside the configured band

use proptest::prelude::*;
use std::time::Duration;

use headroom_retry::BackoffSchedule;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: no attempt ever waits longer than the cap.
    #[test]
    fn delay_never_exceeds_the_cap(
        base_ms in 1u64..=2_000,
        max_ms in 1u64..=120_000,
        multiplier in 1.0f64..=4.0,
        jitter in 0.0f64..=1.0,
        attempt in 1u32..=24,
    ) {
        let schedule = BackoffSchedule::new(
            Duration::from_millis(base_ms),
            Duration::from_millis(max_ms),
            multiplier,
            jitter,
        );

        let delay = schedule.delay_for(attempt);
        prop_assert!(
            delay <= Duration::from_millis(max_ms),
            "attempt {} waited {:?}, cap {:?}",
            attempt,
            delay,
            Duration::from_millis(max_ms)
        );
    }

    /// Property: with jitter disabled, later attempts never wait less.
    #[test]
    fn jitterless_schedule_never_shrinks(
        base_ms in 1u64..=1_000,
        multiplier in 1.0f64..=3.0,
        attempt in 1u32..=20,
    ) {
        let schedule = BackoffSchedule::new(
            Duration::from_millis(base_ms),
            Duration::from_secs(3_600),
            multiplier,
            0.0,
        );

        let this = schedule.delay_for(attempt);
        let next = schedule.delay_for(attempt + 1);
        prop_assert!(
            next >= this,
            "attempt {} waited {:?} but attempt {} waited {:?}",
            attempt,
            this,
            attempt + 1,
            next
        );
    }

    /// Property: jitter keeps the delay inside the band around the raw
    /// exponential value.
    #[test]
    fn jitter_stays_in_band(
        base_ms in 10u64..=500,
        jitter in 0.0f64..=0.5,
        attempt in 1u32..=8,
    ) {
        let max = Duration::from_secs(86_400);
        let jittered = BackoffSchedule::new(
            Duration::from_millis(base_ms),
            max,
            2.0,
            jitter,
        );
        let raw = BackoffSchedule::new(Duration::from_millis(base_ms), max, 2.0, 0.0)
            .delay_for(attempt)
            .as_secs_f64();

        let delay = jittered.delay_for(attempt).as_secs_f64();
        // A hair of float tolerance on each side of the band.
        prop_assert!(
            delay >= raw * (1.0 - jitter) * 0.999,
            "delay {delay} below band for raw {raw}, jitter {jitter}"
        );
        prop_assert!(
            delay <= raw * (1.0 + jitter) * 1.001,
            "delay {delay} above band for raw {raw}, jitter {jitter}"
        );
    }
}
