//! Browser capabilities: the storage slot, the form post, and timers.
//!
//! Native builds get in-memory stand-ins so the crate compiles and tests off
//! the browser.

use std::time::Duration;

use storefront::checkout::Delay;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(not(target_arch = "wasm32"))]
mod native;

#[cfg(target_arch = "wasm32")]
pub(crate) use dom::{BrowserStorage, FormPostSink, wait_for_timeout};
#[cfg(not(target_arch = "wasm32"))]
pub(crate) use native::{BrowserStorage, FormPostSink, wait_for_timeout};

/// `setTimeout`-backed delay for the simulated verifier.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TimeoutDelay;

impl Delay for TimeoutDelay {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        wait_for_timeout(timeout_ms(duration))
    }
}

/// Clamp a duration to the `i32` milliseconds `setTimeout` accepts.
pub(crate) fn timeout_ms(duration: Duration) -> i32 {
    i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_ms_clamps_long_durations() {
        assert_eq!(timeout_ms(Duration::from_millis(2_000)), 2_000);
        assert_eq!(timeout_ms(Duration::from_secs(u64::MAX / 2)), i32::MAX);
    }
}
