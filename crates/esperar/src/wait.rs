//! Presence, absence, and predicate waiters over a Finder.
//!
//! Every waiter comes in two shapes: the blocking `assert_*` form fails the
//! test with a typed `AssertionTimeout` when the deadline expires, and the
//! non-blocking `wait_for_*` form returns `None`/`false` instead. Both forms
//! surface `UnsupportedStrategy` as an error; a configuration mistake is
//! never reported as "not found". That asymmetry is a contract callers may
//! rely on, not an inconsistency.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::clock::Deadline;
use crate::config;
use crate::finder::{Displayed, FindError, Finder};
use crate::handlers::HandlerSet;
use crate::locator::Locator;
use crate::poller::{poll, PollOutcome};
use crate::result::{EsperarError, EsperarResult};

/// Condition a wait is checking, named in failures and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionKind {
    /// The locator resolves to an element
    Presence,
    /// The locator resolves to no element
    Absence,
    /// The locator resolves and a caller-supplied predicate holds
    State,
    /// The locator resolves to a displayed element (or the inverse)
    Visibility,
}

impl ConditionKind {
    /// Stable string form used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Presence => "presence",
            Self::Absence => "absence",
            Self::State => "state",
            Self::Visibility => "visibility",
        }
    }
}

impl std::fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for a single wait call.
///
/// `Default` reads the process-wide tier (see `config`); per-instance and
/// per-call overrides layer on top with the builder methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Total time budget for the wait
    pub timeout: Duration,
    /// Sleep between probes, capped to the remaining time
    pub poll_interval: Duration,
    /// Log a single warning once a still-unsatisfied wait runs this long
    pub warn_after: Option<Duration>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: config::default_timeout(),
            poll_interval: config::default_poll_interval(),
            warn_after: config::default_warn_after(),
        }
    }
}

impl WaitOptions {
    /// Create options from the process-wide defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set or disable the warn threshold.
    #[must_use]
    pub const fn with_warn_after(mut self, warn_after: Option<Duration>) -> Self {
        self.warn_after = warn_after;
        self
    }
}

/// The wait and assertion vocabulary, bound to one Finder.
///
/// A `Waiter` holds a reference to the driver session's Finder plus the
/// instance-tier options; each call derives a fresh deadline and performs
/// fresh lookups, so nothing here goes stale as the UI re-renders.
pub struct Waiter<'f, F> {
    finder: &'f F,
    options: WaitOptions,
}

impl<F> std::fmt::Debug for Waiter<'_, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Waiter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'f, F: Finder> Waiter<'f, F> {
    /// Create a waiter with the process-wide default options.
    #[must_use]
    pub fn new(finder: &'f F) -> Self {
        Self {
            finder,
            options: WaitOptions::default(),
        }
    }

    /// Create a waiter with explicit instance options.
    #[must_use]
    pub const fn with_options(finder: &'f F, options: WaitOptions) -> Self {
        Self { finder, options }
    }

    /// The instance-tier options.
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    // ---- presence ------------------------------------------------------

    /// Block until the locator resolves; fail with `AssertionTimeout` on
    /// deadline. Returns the found element so callers need not re-run the
    /// lookup.
    pub fn assert_present(&self, locator: &Locator) -> EsperarResult<F::Element> {
        self.assert_present_with(locator, &self.options)
    }

    /// `assert_present` with call-tier options.
    pub fn assert_present_with(
        &self,
        locator: &Locator,
        options: &WaitOptions,
    ) -> EsperarResult<F::Element> {
        self.run_present(locator, options, None)?
            .found()
            .ok_or_else(|| timeout_error(locator.to_string(), options, ConditionKind::Presence))
    }

    /// `assert_present`, consulting recovery handlers between polls.
    pub fn assert_present_watched(
        &self,
        locator: &Locator,
        handlers: &mut HandlerSet<F>,
    ) -> EsperarResult<F::Element> {
        self.run_present(locator, &self.options, Some(handlers))?
            .found()
            .ok_or_else(|| {
                timeout_error(locator.to_string(), &self.options, ConditionKind::Presence)
            })
    }

    /// Poll until the locator resolves; `None` on deadline instead of an
    /// error. Still fails for `UnsupportedStrategy` or a fatal driver error.
    pub fn wait_for_present(&self, locator: &Locator) -> EsperarResult<Option<F::Element>> {
        self.wait_for_present_with(locator, &self.options)
    }

    /// `wait_for_present` with call-tier options.
    pub fn wait_for_present_with(
        &self,
        locator: &Locator,
        options: &WaitOptions,
    ) -> EsperarResult<Option<F::Element>> {
        Ok(self.run_present(locator, options, None)?.found())
    }

    // ---- absence -------------------------------------------------------

    /// Block until the locator resolves to nothing.
    ///
    /// Absence is checked through `find_all`: an empty result and an
    /// `Err(NotFound)` are treated identically, unifying empty-list and
    /// exception-raising driver families behind one check. Satisfied on the
    /// first probe if the element is already gone.
    pub fn assert_absent(&self, locator: &Locator) -> EsperarResult<()> {
        self.assert_absent_with(locator, &self.options)
    }

    /// `assert_absent` with call-tier options.
    pub fn assert_absent_with(&self, locator: &Locator, options: &WaitOptions) -> EsperarResult<()> {
        self.run_absent(locator, options, None)?
            .found()
            .ok_or_else(|| timeout_error(locator.to_string(), options, ConditionKind::Absence))
    }

    /// `assert_absent`, consulting recovery handlers between polls.
    pub fn assert_absent_watched(
        &self,
        locator: &Locator,
        handlers: &mut HandlerSet<F>,
    ) -> EsperarResult<()> {
        self.run_absent(locator, &self.options, Some(handlers))?
            .found()
            .ok_or_else(|| {
                timeout_error(locator.to_string(), &self.options, ConditionKind::Absence)
            })
    }

    /// Poll until the locator resolves to nothing; `false` on deadline.
    pub fn wait_for_absent(&self, locator: &Locator) -> EsperarResult<bool> {
        self.wait_for_absent_with(locator, &self.options)
    }

    /// `wait_for_absent` with call-tier options.
    pub fn wait_for_absent_with(
        &self,
        locator: &Locator,
        options: &WaitOptions,
    ) -> EsperarResult<bool> {
        Ok(self.run_absent(locator, options, None)?.is_found())
    }

    // ---- predicate over element ----------------------------------------

    /// Block until the locator resolves *and* the predicate holds for the
    /// element. Mere presence is not enough.
    pub fn assert_state<P>(&self, locator: &Locator, predicate: P) -> EsperarResult<F::Element>
    where
        P: FnMut(&F::Element) -> bool,
    {
        self.assert_state_with(locator, predicate, &self.options)
    }

    /// `assert_state` with call-tier options.
    pub fn assert_state_with<P>(
        &self,
        locator: &Locator,
        mut predicate: P,
        options: &WaitOptions,
    ) -> EsperarResult<F::Element>
    where
        P: FnMut(&F::Element) -> bool,
    {
        self.run(options, ConditionKind::State, &locator.to_string(), None, || {
            state_probe(self.finder, locator, &mut predicate)
        })?
        .found()
        .ok_or_else(|| timeout_error(locator.to_string(), options, ConditionKind::State))
    }

    /// Poll until the predicate holds; `None` on deadline.
    pub fn wait_for_state<P>(
        &self,
        locator: &Locator,
        predicate: P,
    ) -> EsperarResult<Option<F::Element>>
    where
        P: FnMut(&F::Element) -> bool,
    {
        self.wait_for_state_with(locator, predicate, &self.options)
    }

    /// `wait_for_state` with call-tier options.
    pub fn wait_for_state_with<P>(
        &self,
        locator: &Locator,
        mut predicate: P,
        options: &WaitOptions,
    ) -> EsperarResult<Option<F::Element>>
    where
        P: FnMut(&F::Element) -> bool,
    {
        Ok(self
            .run(options, ConditionKind::State, &locator.to_string(), None, || {
                state_probe(self.finder, locator, &mut predicate)
            })?
            .found())
    }

    // ---- visibility (requires the Displayed capability) ----------------

    /// Block until the locator resolves to a displayed element.
    pub fn assert_visible(&self, locator: &Locator) -> EsperarResult<F::Element>
    where
        F::Element: Displayed,
    {
        self.assert_visible_with(locator, &self.options)
    }

    /// `assert_visible` with call-tier options.
    pub fn assert_visible_with(
        &self,
        locator: &Locator,
        options: &WaitOptions,
    ) -> EsperarResult<F::Element>
    where
        F::Element: Displayed,
    {
        self.run(
            options,
            ConditionKind::Visibility,
            &locator.to_string(),
            None,
            || state_probe(self.finder, locator, &mut |el: &F::Element| el.is_displayed()),
        )?
        .found()
        .ok_or_else(|| timeout_error(locator.to_string(), options, ConditionKind::Visibility))
    }

    /// Poll until the locator resolves to a displayed element; `None` on
    /// deadline.
    pub fn wait_for_visible(&self, locator: &Locator) -> EsperarResult<Option<F::Element>>
    where
        F::Element: Displayed,
    {
        Ok(self
            .run(
                &self.options,
                ConditionKind::Visibility,
                &locator.to_string(),
                None,
                || state_probe(self.finder, locator, &mut |el: &F::Element| el.is_displayed()),
            )?
            .found())
    }

    /// Block until the locator resolves to nothing, or to an element that is
    /// not displayed.
    pub fn assert_hidden(&self, locator: &Locator) -> EsperarResult<()>
    where
        F::Element: Displayed,
    {
        self.run(
            &self.options,
            ConditionKind::Visibility,
            &locator.to_string(),
            None,
            || hidden_probe(self.finder, locator),
        )?
        .found()
        .ok_or_else(|| {
            timeout_error(locator.to_string(), &self.options, ConditionKind::Visibility)
        })
    }

    /// Poll until the element is gone or undisplayed; `false` on deadline.
    pub fn wait_for_hidden(&self, locator: &Locator) -> EsperarResult<bool>
    where
        F::Element: Displayed,
    {
        Ok(self
            .run(
                &self.options,
                ConditionKind::Visibility,
                &locator.to_string(),
                None,
                || hidden_probe(self.finder, locator),
            )?
            .is_found())
    }

    // ---- multiple locators ---------------------------------------------

    /// Block until every locator resolves within a single probe pass.
    /// Returns the elements in locator order.
    pub fn assert_all_present(&self, locators: &[Locator]) -> EsperarResult<Vec<F::Element>> {
        self.assert_all_present_with(locators, &self.options)
    }

    /// `assert_all_present` with call-tier options.
    pub fn assert_all_present_with(
        &self,
        locators: &[Locator],
        options: &WaitOptions,
    ) -> EsperarResult<Vec<F::Element>> {
        let descr = describe_all(locators);
        self.run(options, ConditionKind::Presence, &descr, None, || {
            all_present_probe(self.finder, locators)
        })?
        .found()
        .ok_or_else(|| timeout_error(descr.clone(), options, ConditionKind::Presence))
    }

    /// Poll until every locator resolves within one pass; `None` on deadline.
    pub fn wait_for_all_present(
        &self,
        locators: &[Locator],
    ) -> EsperarResult<Option<Vec<F::Element>>> {
        let descr = describe_all(locators);
        Ok(self
            .run(&self.options, ConditionKind::Presence, &descr, None, || {
                all_present_probe(self.finder, locators)
            })?
            .found())
    }

    /// Block until any locator resolves; returns the first match's element.
    pub fn assert_any_present(&self, locators: &[Locator]) -> EsperarResult<F::Element> {
        self.assert_any_present_with(locators, &self.options)
    }

    /// `assert_any_present` with call-tier options.
    pub fn assert_any_present_with(
        &self,
        locators: &[Locator],
        options: &WaitOptions,
    ) -> EsperarResult<F::Element> {
        let descr = describe_all(locators);
        self.run(options, ConditionKind::Presence, &descr, None, || {
            any_present_probe(self.finder, locators)
        })?
        .found()
        .ok_or_else(|| timeout_error(descr.clone(), options, ConditionKind::Presence))
    }

    /// `assert_any_present`, consulting recovery handlers between polls.
    pub fn assert_any_present_watched(
        &self,
        locators: &[Locator],
        handlers: &mut HandlerSet<F>,
    ) -> EsperarResult<F::Element> {
        let descr = describe_all(locators);
        self.run(
            &self.options,
            ConditionKind::Presence,
            &descr,
            Some(handlers),
            || any_present_probe(self.finder, locators),
        )?
        .found()
        .ok_or_else(|| timeout_error(descr.clone(), &self.options, ConditionKind::Presence))
    }

    /// Poll until any locator resolves; `None` on deadline.
    pub fn wait_for_any_present(
        &self,
        locators: &[Locator],
    ) -> EsperarResult<Option<F::Element>> {
        let descr = describe_all(locators);
        Ok(self
            .run(&self.options, ConditionKind::Presence, &descr, None, || {
                any_present_probe(self.finder, locators)
            })?
            .found())
    }

    // ---- core loop -----------------------------------------------------

    fn run_present(
        &self,
        locator: &Locator,
        options: &WaitOptions,
        handlers: Option<&mut HandlerSet<F>>,
    ) -> EsperarResult<PollOutcome<F::Element>> {
        self.run(options, ConditionKind::Presence, &locator.to_string(), handlers, || {
            present_probe(self.finder, locator)
        })
    }

    fn run_absent(
        &self,
        locator: &Locator,
        options: &WaitOptions,
        handlers: Option<&mut HandlerSet<F>>,
    ) -> EsperarResult<PollOutcome<()>> {
        self.run(options, ConditionKind::Absence, &locator.to_string(), handlers, || {
            absent_probe(self.finder, locator)
        })
    }

    fn run<T>(
        &self,
        options: &WaitOptions,
        kind: ConditionKind,
        descr: &str,
        mut handlers: Option<&mut HandlerSet<F>>,
        mut probe: impl FnMut() -> EsperarResult<Option<T>>,
    ) -> EsperarResult<PollOutcome<T>> {
        let deadline = Deadline::from_timeout(options.timeout);
        let started = Instant::now();
        let mut warned = false;

        poll(
            || {
                if let Some(value) = probe()? {
                    return Ok(Some(value));
                }
                if let Some(warn_after) = options.warn_after {
                    if !warned && started.elapsed() >= warn_after {
                        tracing::warn!(
                            "still waiting for {kind} of {descr} after {:?}",
                            started.elapsed()
                        );
                        warned = true;
                    }
                }
                if let Some(set) = &mut handlers {
                    set.consult(self.finder)?;
                }
                Ok(None)
            },
            deadline,
            options.poll_interval,
        )
    }
}

// ---- probe shapes ------------------------------------------------------

fn present_probe<F: Finder>(finder: &F, locator: &Locator) -> EsperarResult<Option<F::Element>> {
    match finder.find_one(locator) {
        Ok(element) => Ok(Some(element)),
        Err(FindError::NotFound { .. }) => {
            tracing::debug!("locator {locator} did not resolve to an element");
            Ok(None)
        }
        Err(fatal) => Err(fatal.into()),
    }
}

fn absent_probe<F: Finder>(finder: &F, locator: &Locator) -> EsperarResult<Option<()>> {
    match finder.find_all(locator) {
        Ok(elements) if elements.is_empty() => Ok(Some(())),
        Ok(_) => {
            tracing::debug!("locator {locator} still resolves to at least one element");
            Ok(None)
        }
        // Exception-raising driver family: not-found means absent.
        Err(FindError::NotFound { .. }) => Ok(Some(())),
        Err(fatal) => Err(fatal.into()),
    }
}

fn state_probe<F, P>(finder: &F, locator: &Locator, predicate: &mut P) -> EsperarResult<Option<F::Element>>
where
    F: Finder,
    P: FnMut(&F::Element) -> bool,
{
    match present_probe(finder, locator)? {
        Some(element) if predicate(&element) => Ok(Some(element)),
        Some(_) => {
            tracing::debug!("locator {locator} resolved, but its state predicate does not hold");
            Ok(None)
        }
        None => Ok(None),
    }
}

fn hidden_probe<F>(finder: &F, locator: &Locator) -> EsperarResult<Option<()>>
where
    F: Finder,
    F::Element: Displayed,
{
    match finder.find_one(locator) {
        Ok(element) => {
            if element.is_displayed() {
                tracing::debug!("locator {locator} still resolves to a displayed element");
                Ok(None)
            } else {
                Ok(Some(()))
            }
        }
        Err(FindError::NotFound { .. }) => Ok(Some(())),
        Err(fatal) => Err(fatal.into()),
    }
}

fn all_present_probe<F: Finder>(
    finder: &F,
    locators: &[Locator],
) -> EsperarResult<Option<Vec<F::Element>>> {
    let mut elements = Vec::with_capacity(locators.len());
    for locator in locators {
        match finder.find_one(locator) {
            Ok(element) => elements.push(element),
            Err(FindError::NotFound { .. }) => {
                tracing::debug!("locator {locator} did not resolve to an element");
                return Ok(None);
            }
            Err(fatal) => return Err(fatal.into()),
        }
    }
    Ok(Some(elements))
}

fn any_present_probe<F: Finder>(
    finder: &F,
    locators: &[Locator],
) -> EsperarResult<Option<F::Element>> {
    for locator in locators {
        match finder.find_one(locator) {
            Ok(element) => return Ok(Some(element)),
            Err(FindError::NotFound { .. }) => {}
            Err(fatal) => return Err(fatal.into()),
        }
    }
    tracing::debug!("none of {} resolved to an element", describe_all(locators));
    Ok(None)
}

fn describe_all(locators: &[Locator]) -> String {
    let joined: Vec<String> = locators.iter().map(ToString::to_string).collect();
    format!("[{}]", joined.join(", "))
}

fn timeout_error(locator: String, options: &WaitOptions, kind: ConditionKind) -> EsperarError {
    EsperarError::AssertionTimeout {
        locator,
        timeout: options.timeout,
        kind,
    }
}
