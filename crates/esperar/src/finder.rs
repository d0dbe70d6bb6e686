//! The Finder capability: the driver boundary this crate consumes.
//!
//! A Finder resolves a `Locator` to zero, one, or many elements. Web and
//! mobile driver adapters implement this trait; the core never depends on a
//! specific driver API beyond it. The element type is opaque to the core,
//! which only hands elements back to caller-supplied predicates.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use thiserror::Error;

use crate::locator::{Locator, Strategy};

/// Errors a Finder may raise during lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FindError {
    /// No element matches the locator yet. Transient: waiters retry this
    /// internally and never surface it.
    #[error("no element matches {locator}")]
    NotFound {
        /// Description of the locator that did not resolve
        locator: String,
    },

    /// The driver does not recognize the locator's strategy. A configuration
    /// error: always surfaced, never retried.
    #[error("lookup strategy '{strategy}' is not supported by this driver")]
    UnsupportedStrategy {
        /// The unrecognized strategy
        strategy: Strategy,
    },

    /// Any other driver failure. Fatal: aborts the current wait unchanged.
    #[error("driver error: {message}")]
    Backend {
        /// Driver-reported failure message
        message: String,
    },
}

impl FindError {
    /// Convenience constructor for the transient not-found signal.
    #[must_use]
    pub fn not_found(locator: &Locator) -> Self {
        Self::NotFound {
            locator: locator.to_string(),
        }
    }
}

/// Driver capability that resolves a `Locator` to elements.
///
/// Contract:
///
/// - `find_one` fails with `FindError::NotFound` when no match exists yet,
///   fails with `FindError::UnsupportedStrategy` when the strategy is
///   unrecognized, and returns exactly one element on success.
/// - `find_all` returns an empty vec (not a failure) when no match exists,
///   distinguishing "no element" (legitimate transient state) from "driver
///   cannot look this up" (configuration error). Drivers in the
///   exception-raising family may return `Err(NotFound)` instead; the
///   absence waiter treats both identically.
///
/// Implementations are not required to be thread-safe; a Finder belongs to
/// one driver session and one thread of control at a time.
pub trait Finder {
    /// Driver-owned element handle. Opaque to this crate.
    type Element;

    /// Resolve the locator to exactly one element.
    fn find_one(&self, locator: &Locator) -> Result<Self::Element, FindError>;

    /// Resolve the locator to all matching elements.
    fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, FindError>;
}

/// Element-state capability for visibility waits.
///
/// Adapters implement this on their element type when the underlying driver
/// can report whether an element is actually rendered, enabling the
/// `*_visible` / `*_hidden` waiter vocabulary.
pub trait Displayed {
    /// Whether the element is rendered on screen.
    fn is_displayed(&self) -> bool;
}

/// Element returned by [`ScriptedFinder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedElement {
    /// Identifier, for test verification
    pub id: String,
    /// Text content
    pub text: String,
    /// Whether the element reports as displayed
    pub displayed: bool,
}

impl ScriptedElement {
    /// Create a displayed element with empty text.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            displayed: true,
        }
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set whether the element reports as displayed.
    #[must_use]
    pub const fn with_displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }
}

impl Displayed for ScriptedElement {
    fn is_displayed(&self) -> bool {
        self.displayed
    }
}

/// One scripted lookup outcome for [`ScriptedFinder`].
#[derive(Debug, Clone)]
pub enum Step {
    /// Empty-list family: `find_one` raises `NotFound`, `find_all` returns `[]`
    Absent,
    /// Exception family: both `find_one` and `find_all` raise `NotFound`
    AbsentRaising,
    /// A single matching element
    One(ScriptedElement),
    /// Multiple matching elements
    Many(Vec<ScriptedElement>),
    /// The strategy is rejected as unsupported
    Unsupported,
    /// A fatal driver failure with the given message
    Fatal(String),
}

/// In-memory Finder replaying a scripted sequence of lookup outcomes.
///
/// Each `find_one`/`find_all` call consumes the next step; once the script
/// is exhausted the final step repeats, so "absent three times, then
/// present" and "always absent" are both one-liners. A call counter supports
/// asserting how many probes a wait performed.
///
/// Useful for testing waits and page objects without a live driver.
#[derive(Debug, Default)]
pub struct ScriptedFinder {
    steps: RefCell<VecDeque<Step>>,
    last: RefCell<Option<Step>>,
    calls: Cell<usize>,
}

impl ScriptedFinder {
    /// Create a finder with an empty script; every lookup reports `Absent`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a finder that repeats a single step forever.
    #[must_use]
    pub fn replaying(step: Step) -> Self {
        let finder = Self::new();
        *finder.last.borrow_mut() = Some(step);
        finder
    }

    /// Append a step to the script.
    #[must_use]
    pub fn then(self, step: Step) -> Self {
        self.steps.borrow_mut().push_back(step);
        self
    }

    /// Number of lookup calls performed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn next_step(&self) -> Step {
        self.calls.set(self.calls.get() + 1);
        if let Some(step) = self.steps.borrow_mut().pop_front() {
            *self.last.borrow_mut() = Some(step.clone());
            return step;
        }
        self.last.borrow().clone().unwrap_or(Step::Absent)
    }
}

impl Finder for ScriptedFinder {
    type Element = ScriptedElement;

    fn find_one(&self, locator: &Locator) -> Result<Self::Element, FindError> {
        match self.next_step() {
            Step::Absent | Step::AbsentRaising => Err(FindError::not_found(locator)),
            Step::One(element) => Ok(element),
            Step::Many(elements) => elements
                .into_iter()
                .next()
                .ok_or_else(|| FindError::not_found(locator)),
            Step::Unsupported => Err(FindError::UnsupportedStrategy {
                strategy: locator.strategy(),
            }),
            Step::Fatal(message) => Err(FindError::Backend { message }),
        }
    }

    fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, FindError> {
        match self.next_step() {
            Step::Absent => Ok(Vec::new()),
            Step::AbsentRaising => Err(FindError::not_found(locator)),
            Step::One(element) => Ok(vec![element]),
            Step::Many(elements) => Ok(elements),
            Step::Unsupported => Err(FindError::UnsupportedStrategy {
                strategy: locator.strategy(),
            }),
            Step::Fatal(message) => Err(FindError::Backend { message }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn locator() -> Locator {
        Locator::css("button.submit")
    }

    mod find_error_tests {
        use super::*;

        #[test]
        fn test_not_found_carries_locator() {
            let err = FindError::not_found(&locator());
            assert!(err.to_string().contains("css=button.submit"));
        }

        #[test]
        fn test_unsupported_strategy_names_strategy() {
            let err = FindError::UnsupportedStrategy {
                strategy: Strategy::AccessibilityId,
            };
            assert!(err.to_string().contains("accessibility-id"));
        }
    }

    mod scripted_finder_tests {
        use super::*;

        #[test]
        fn test_empty_script_is_always_absent() {
            let finder = ScriptedFinder::new();
            assert!(matches!(
                finder.find_one(&locator()),
                Err(FindError::NotFound { .. })
            ));
            assert_eq!(finder.find_all(&locator()).unwrap(), Vec::new());
            assert_eq!(finder.calls(), 2);
        }

        #[test]
        fn test_script_consumed_in_order_then_last_repeats() {
            let finder = ScriptedFinder::new()
                .then(Step::Absent)
                .then(Step::One(ScriptedElement::new("ok")));

            assert!(finder.find_one(&locator()).is_err());
            assert_eq!(finder.find_one(&locator()).unwrap().id, "ok");
            // Script exhausted: final step repeats.
            assert_eq!(finder.find_one(&locator()).unwrap().id, "ok");
            assert_eq!(finder.calls(), 3);
        }

        #[test]
        fn test_replaying_repeats_forever() {
            let finder = ScriptedFinder::replaying(Step::AbsentRaising);
            for _ in 0..3 {
                assert!(matches!(
                    finder.find_all(&locator()),
                    Err(FindError::NotFound { .. })
                ));
            }
        }

        #[test]
        fn test_unsupported_step_reports_locator_strategy() {
            let finder = ScriptedFinder::replaying(Step::Unsupported);
            let err = finder.find_one(&Locator::xpath("//a")).unwrap_err();
            assert!(matches!(
                err,
                FindError::UnsupportedStrategy {
                    strategy: Strategy::XPath
                }
            ));
        }

        #[test]
        fn test_fatal_step_is_backend_error() {
            let finder = ScriptedFinder::replaying(Step::Fatal("session died".into()));
            let err = finder.find_all(&locator()).unwrap_err();
            assert!(matches!(err, FindError::Backend { .. }));
            assert!(err.to_string().contains("session died"));
        }

        #[test]
        fn test_many_step_find_one_takes_first() {
            let finder = ScriptedFinder::replaying(Step::Many(vec![
                ScriptedElement::new("a"),
                ScriptedElement::new("b"),
            ]));
            assert_eq!(finder.find_one(&locator()).unwrap().id, "a");
            assert_eq!(finder.find_all(&locator()).unwrap().len(), 2);
        }
    }

    mod scripted_element_tests {
        use super::*;

        #[test]
        fn test_element_builders() {
            let el = ScriptedElement::new("score")
                .with_text("10")
                .with_displayed(false);
            assert_eq!(el.id, "score");
            assert_eq!(el.text, "10");
            assert!(!el.is_displayed());
        }

        #[test]
        fn test_new_element_is_displayed() {
            assert!(ScriptedElement::new("x").is_displayed());
        }
    }
}
