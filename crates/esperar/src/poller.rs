//! The poll loop every waiter is built on.
//!
//! `poll` repeatedly invokes a caller-supplied probe until it yields a value
//! or the deadline expires, sleeping a bounded interval between attempts.
//! Translation of driver-specific "not found" signals into `Ok(None)` is the
//! probe's job (see `wait`); any error the probe returns aborts the loop
//! immediately.

use std::time::Duration;

use crate::clock::Deadline;
use crate::result::EsperarResult;

/// Terminal outcome of a poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The probe produced a value before (or at) the deadline
    Found(T),
    /// The deadline expired with the probe still unsatisfied
    TimedOut,
}

impl<T> PollOutcome<T> {
    /// Convert into `Some(value)` on success, `None` on timeout.
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::TimedOut => None,
        }
    }

    /// Whether the poll succeeded.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Poll `probe` until it returns `Ok(Some(value))` or `deadline` expires.
///
/// Guarantees:
///
/// - the probe runs at least once, even against an already-expired deadline
///   ("check once, don't wait" semantics for zero timeouts);
/// - a satisfied probe returns immediately, without sleeping, even past the
///   deadline: the last probe result is authoritative;
/// - the sleep between attempts never exceeds the remaining time, so the
///   loop overshoots the deadline by at most one probe.
///
/// Any `Err` from the probe propagates immediately; a fatal driver error
/// must not be mistaken for "still waiting".
pub fn poll<T, F>(mut probe: F, deadline: Deadline, interval: Duration) -> EsperarResult<PollOutcome<T>>
where
    F: FnMut() -> EsperarResult<Option<T>>,
{
    loop {
        if let Some(value) = probe()? {
            return Ok(PollOutcome::Found(value));
        }
        if deadline.expired() {
            return Ok(PollOutcome::TimedOut);
        }
        let nap = interval.min(deadline.remaining());
        if !nap.is_zero() {
            std::thread::sleep(nap);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::finder::FindError;
    use crate::locator::Strategy;
    use crate::result::EsperarError;
    use std::time::Instant;

    #[test]
    fn test_probe_runs_exactly_once_on_zero_timeout() {
        let mut calls = 0;
        let outcome = poll(
            || {
                calls += 1;
                Ok(None::<()>)
            },
            Deadline::from_timeout(Duration::ZERO),
            Duration::from_millis(10),
        )
        .unwrap();
        assert_eq!(calls, 1);
        assert!(!outcome.is_found());
    }

    #[test]
    fn test_immediate_success_does_not_sleep() {
        let start = Instant::now();
        let outcome = poll(
            || Ok(Some(42)),
            Deadline::from_timeout(Duration::from_secs(30)),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(outcome.found(), Some(42));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_success_past_deadline_is_authoritative() {
        let mut calls = 0;
        let outcome = poll(
            || {
                calls += 1;
                // Satisfied on the very first (and only) probe of an
                // already-expired deadline.
                Ok(Some("late"))
            },
            Deadline::from_timeout(Duration::ZERO),
            Duration::from_millis(10),
        )
        .unwrap();
        assert_eq!(outcome.found(), Some("late"));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_eventual_success_after_retries() {
        let mut calls = 0;
        let outcome = poll(
            || {
                calls += 1;
                Ok((calls >= 4).then_some(calls))
            },
            Deadline::from_timeout(Duration::from_secs(1)),
            Duration::from_millis(10),
        )
        .unwrap();
        assert_eq!(outcome.found(), Some(4));
    }

    #[test]
    fn test_timeout_after_unsatisfied_probes() {
        let start = Instant::now();
        let mut calls = 0;
        let outcome = poll(
            || {
                calls += 1;
                Ok(None::<()>)
            },
            Deadline::from_timeout(Duration::from_millis(50)),
            Duration::from_millis(10),
        )
        .unwrap();
        assert!(!outcome.is_found());
        assert!(calls >= 2);
        // One probe past expiry at most, so no runaway overshoot.
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_probe_error_aborts_immediately() {
        let mut calls = 0;
        let result: EsperarResult<PollOutcome<()>> = poll(
            || {
                calls += 1;
                Err(FindError::UnsupportedStrategy {
                    strategy: Strategy::AccessibilityId,
                }
                .into())
            },
            Deadline::from_timeout(Duration::from_secs(5)),
            Duration::from_millis(10),
        );
        assert_eq!(calls, 1);
        assert!(matches!(
            result,
            Err(EsperarError::Find(FindError::UnsupportedStrategy { .. }))
        ));
    }

    #[test]
    fn test_interval_capped_to_remaining_time() {
        let start = Instant::now();
        let outcome = poll(
            || Ok(None::<()>),
            Deadline::from_timeout(Duration::from_millis(40)),
            // An interval far larger than the timeout must not stretch the wait.
            Duration::from_secs(10),
        )
        .unwrap();
        assert!(!outcome.is_found());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_poll_outcome_accessors() {
        let found: PollOutcome<u8> = PollOutcome::Found(7);
        assert!(found.is_found());
        assert_eq!(found.found(), Some(7));

        let timed_out: PollOutcome<u8> = PollOutcome::TimedOut;
        assert!(!timed_out.is_found());
        assert_eq!(timed_out.found(), None);
    }
}
