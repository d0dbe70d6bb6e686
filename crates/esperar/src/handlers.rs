//! Recovery handlers consulted while a blocking wait is unsatisfied.
//!
//! A wait can be starved by UI the test did not ask for: an error dialog, a
//! rating prompt, a permission sheet. A handler pairs a locator for such an
//! obstacle with an action that clears it. Watched waits consult one handler
//! between polls, in rotation, so a single slow handler cannot monopolize
//! the wait.

use std::collections::VecDeque;
use std::time::Duration;

use crate::clock::Deadline;
use crate::finder::{FindError, Finder};
use crate::locator::Locator;
use crate::result::EsperarResult;

/// A (locator, action) pair that clears one kind of unexpected UI.
///
/// The action receives the resolved element and returns whether the handler
/// should stay armed: `true` to be consulted again later, `false` to retire
/// (its job is done for the rest of this wait).
pub struct Handler<F: Finder> {
    locator: Locator,
    action: Box<dyn FnMut(&F::Element) -> bool>,
}

impl<F: Finder> Handler<F> {
    /// Create a handler.
    pub fn new(locator: Locator, action: impl FnMut(&F::Element) -> bool + 'static) -> Self {
        Self {
            locator,
            action: Box::new(action),
        }
    }

    /// The obstacle's locator.
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }
}

impl<F: Finder> std::fmt::Debug for Handler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

/// An ordered rotation of recovery handlers.
pub struct HandlerSet<F: Finder> {
    entries: VecDeque<Handler<F>>,
}

impl<F: Finder> Default for HandlerSet<F> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

impl<F: Finder> std::fmt::Debug for HandlerSet<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let locators: Vec<String> = self.entries.iter().map(|h| h.locator.to_string()).collect();
        f.debug_struct("HandlerSet")
            .field("locators", &locators)
            .finish()
    }
}

impl<F: Finder> HandlerSet<F> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler (builder form).
    #[must_use]
    pub fn on(mut self, locator: Locator, action: impl FnMut(&F::Element) -> bool + 'static) -> Self {
        self.push(Handler::new(locator, action));
        self
    }

    /// Add a handler.
    pub fn push(&mut self, handler: Handler<F>) {
        self.entries.push_back(handler);
    }

    /// Number of armed handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no handlers remain armed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consult the next handler in rotation.
    ///
    /// If its locator resolves, the action runs and decides whether the
    /// handler stays armed; if the locator does not resolve, the handler
    /// stays armed untouched. One handler per consultation. A fatal lookup
    /// error propagates and leaves the set intact.
    pub fn consult(&mut self, finder: &F) -> EsperarResult<()> {
        let Some(mut handler) = self.entries.pop_front() else {
            return Ok(());
        };

        match finder.find_one(&handler.locator) {
            Ok(element) => {
                tracing::debug!("handler obstacle {} is present, running action", handler.locator);
                if (handler.action)(&element) {
                    self.entries.push_back(handler);
                }
            }
            Err(FindError::NotFound { .. }) => {
                self.entries.push_back(handler);
            }
            Err(fatal) => {
                self.entries.push_front(handler);
                return Err(fatal.into());
            }
        }
        Ok(())
    }

    /// Consult handlers repeatedly until every handler has retired or
    /// `max_duration` elapses.
    ///
    /// Useful on its own to settle a screen known to show transient prompts
    /// before the test proceeds.
    pub fn watch(&mut self, finder: &F, max_duration: Duration, interval: Duration) -> EsperarResult<()> {
        let deadline = Deadline::from_timeout(max_duration);
        while !self.is_empty() {
            self.consult(finder)?;
            if deadline.expired() {
                break;
            }
            if !interval.is_zero() {
                std::thread::sleep(interval);
            }
        }
        Ok(())
    }
}
