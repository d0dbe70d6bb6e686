//! Process-wide wait defaults.
//!
//! The bottom tier of the three-tier override: call > instance > process.
//! `WaitOptions::default()` reads this tier once per construction; changing
//! a default never affects a wait already in flight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (200ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Default warn threshold: a still-unsatisfied wait logs once past this (5s)
pub const DEFAULT_WARN_AFTER_MS: u64 = 5_000;

// 0 in WARN_AFTER_MS means the warn threshold is disabled.
static TIMEOUT_MS: AtomicU64 = AtomicU64::new(DEFAULT_WAIT_TIMEOUT_MS);
static POLL_INTERVAL_MS: AtomicU64 = AtomicU64::new(DEFAULT_POLL_INTERVAL_MS);
static WARN_AFTER_MS: AtomicU64 = AtomicU64::new(DEFAULT_WARN_AFTER_MS);

fn to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Set the process-wide default timeout.
pub fn set_default_timeout(timeout: Duration) {
    TIMEOUT_MS.store(to_ms(timeout), Ordering::SeqCst);
}

/// The process-wide default timeout.
#[must_use]
pub fn default_timeout() -> Duration {
    Duration::from_millis(TIMEOUT_MS.load(Ordering::SeqCst))
}

/// Set the process-wide default polling interval.
pub fn set_default_poll_interval(interval: Duration) {
    POLL_INTERVAL_MS.store(to_ms(interval), Ordering::SeqCst);
}

/// The process-wide default polling interval.
#[must_use]
pub fn default_poll_interval() -> Duration {
    Duration::from_millis(POLL_INTERVAL_MS.load(Ordering::SeqCst))
}

/// Set the process-wide warn threshold; `None` disables warning.
pub fn set_default_warn_after(warn_after: Option<Duration>) {
    WARN_AFTER_MS.store(warn_after.map_or(0, to_ms), Ordering::SeqCst);
}

/// The process-wide warn threshold, if enabled.
#[must_use]
pub fn default_warn_after() -> Option<Duration> {
    match WARN_AFTER_MS.load(Ordering::SeqCst) {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    }
}
