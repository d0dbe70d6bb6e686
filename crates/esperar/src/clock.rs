//! Deadline arithmetic for wait operations.
//!
//! A deadline is derived once per wait call from a timeout duration and never
//! recomputed mid-wait, so total wait time stays bounded even when probing
//! itself is slow.

use std::time::{Duration, Instant};

/// An absolute point in time after which a wait gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    /// Create a deadline `timeout` from now.
    ///
    /// A zero timeout yields an already-expired deadline; wait functions
    /// still probe exactly once before declaring timeout.
    #[must_use]
    pub fn from_timeout(timeout: Duration) -> Self {
        let now = Instant::now();
        // Saturate absurdly large timeouts instead of panicking on overflow.
        let expires_at = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + Duration::from_secs(60 * 60 * 24 * 365));
        Self { expires_at }
    }

    /// Whether the deadline has passed.
    #[must_use]
    pub fn expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Time left until expiry, saturating to zero.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
