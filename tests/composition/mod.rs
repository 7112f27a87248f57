//! End-to-end flows composing the headroom components the way a real
//! API client does.
//!
//! The stub API in [`client`] plays the remote side: it counts requests,
//! burns a rate limit window, emits `X-RateLimit-*` headers, and can be
//! told to fail for a while. Everything else is the real crates wired
//! together.


mod batch_flows;
mod flows;

/// Routes component debug logs through the test writer, so a failing flow
/// shows what the limiter and retryer were doing. Only the first call
/// installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}
