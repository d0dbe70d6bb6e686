//! Page Object support: one value per logical screen, speaking waits.
//!
//! A page object encapsulates one UI screen and exposes assertions and
//! waits instead of raw element lookups. Implementors supply the Finder of
//! the current driver session (by reference; the session owns it) and
//! optionally their own instance-tier wait options. The whole vocabulary is
//! provided methods, so a keyword-table runner can call page objects by
//! stable `assert_` / `is_` / `wait_for_` method names.
//!
//! Page objects never cache element handles across calls: the UI re-renders
//! and handles go stale, so every wait performs a fresh lookup.
//!
//! Composite waits ("wait for screen loaded" = presence of a defining
//! element) belong to the implementing type, composed from these
//! primitives; the trait does not special-case screen-level composites.
//!
//! # Example
//!
//! ```ignore
//! struct LoginScreen<'d, F: Finder> {
//!     finder: &'d F,
//! }
//!
//! impl<F: Finder> PageObject for LoginScreen<'_, F> {
//!     type Finder = F;
//!
//!     fn finder(&self) -> &F {
//!         self.finder
//!     }
//! }
//!
//! impl<F: Finder> LoginScreen<'_, F> {
//!     fn username_field() -> Locator {
//!         Locator::name("username")
//!     }
//!
//!     fn wait_for_screen_loaded(&self) -> EsperarResult<()> {
//!         self.assert_present(&Self::username_field())?;
//!         Ok(())
//!     }
//! }
//! ```

use std::time::Duration;

use crate::finder::{Displayed, Finder};
use crate::locator::Locator;
use crate::result::EsperarResult;
use crate::wait::{WaitOptions, Waiter};

/// Base abstraction for page objects.
///
/// Implementors provide the Finder; everything else is inherited. Timeouts
/// resolve through three tiers: an explicit `*_within` argument (call tier)
/// beats [`PageObject::wait_options`] (instance tier) beats the process-wide
/// defaults.
pub trait PageObject {
    /// The driver capability this screen's lookups go through.
    type Finder: Finder;

    /// The session-scoped Finder. A reference: the driver session owns it.
    fn finder(&self) -> &Self::Finder;

    /// Name for diagnostics; defaults to the implementing type's name.
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Instance-tier wait options; defaults to the process-wide tier.
    fn wait_options(&self) -> WaitOptions {
        WaitOptions::default()
    }

    /// A fresh waiter over this page's Finder and instance options.
    fn waiter(&self) -> Waiter<'_, Self::Finder> {
        Waiter::with_options(self.finder(), self.wait_options())
    }

    // ---- presence ------------------------------------------------------

    /// Assert the element appears within the instance timeout; returns it.
    fn assert_present(&self, locator: &Locator) -> EsperarResult<<Self::Finder as Finder>::Element> {
        self.waiter().assert_present(locator)
    }

    /// `assert_present` with a call-tier timeout.
    fn assert_present_within(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> EsperarResult<<Self::Finder as Finder>::Element> {
        let options = self.wait_options().with_timeout(timeout);
        self.waiter().assert_present_with(locator, &options)
    }

    /// Wait for the element; `None` if it never appears in time.
    fn wait_for_present(
        &self,
        locator: &Locator,
    ) -> EsperarResult<Option<<Self::Finder as Finder>::Element>> {
        self.waiter().wait_for_present(locator)
    }

    /// Whether the element is present right now: a single probe, no waiting.
    fn is_present(&self, locator: &Locator) -> EsperarResult<bool> {
        let options = self.wait_options().with_timeout(Duration::ZERO);
        Ok(self
            .waiter()
            .wait_for_present_with(locator, &options)?
            .is_some())
    }

    // ---- absence -------------------------------------------------------

    /// Assert the element disappears (or is already gone) within the
    /// instance timeout.
    fn assert_absent(&self, locator: &Locator) -> EsperarResult<()> {
        self.waiter().assert_absent(locator)
    }

    /// `assert_absent` with a call-tier timeout.
    fn assert_absent_within(&self, locator: &Locator, timeout: Duration) -> EsperarResult<()> {
        let options = self.wait_options().with_timeout(timeout);
        self.waiter().assert_absent_with(locator, &options)
    }

    /// Wait for the element to be gone; `false` if it persists past the
    /// timeout.
    fn wait_for_absent(&self, locator: &Locator) -> EsperarResult<bool> {
        self.waiter().wait_for_absent(locator)
    }

    /// Whether the element is absent right now: a single probe, no waiting.
    fn is_absent(&self, locator: &Locator) -> EsperarResult<bool> {
        let options = self.wait_options().with_timeout(Duration::ZERO);
        self.waiter().wait_for_absent_with(locator, &options)
    }

    // ---- predicate over element ----------------------------------------

    /// Assert the element appears and the predicate holds for it; returns
    /// the element.
    fn assert_state<P>(
        &self,
        locator: &Locator,
        predicate: P,
    ) -> EsperarResult<<Self::Finder as Finder>::Element>
    where
        P: FnMut(&<Self::Finder as Finder>::Element) -> bool,
    {
        self.waiter().assert_state(locator, predicate)
    }

    /// Wait for the predicate to hold; `None` on timeout.
    fn wait_for_state<P>(
        &self,
        locator: &Locator,
        predicate: P,
    ) -> EsperarResult<Option<<Self::Finder as Finder>::Element>>
    where
        P: FnMut(&<Self::Finder as Finder>::Element) -> bool,
    {
        self.waiter().wait_for_state(locator, predicate)
    }

    // ---- visibility (requires the Displayed capability) ----------------

    /// Assert the element appears and reports as displayed; returns it.
    fn assert_visible(&self, locator: &Locator) -> EsperarResult<<Self::Finder as Finder>::Element>
    where
        <Self::Finder as Finder>::Element: Displayed,
    {
        self.waiter().assert_visible(locator)
    }

    /// Wait for a displayed element; `None` on timeout.
    fn wait_for_visible(
        &self,
        locator: &Locator,
    ) -> EsperarResult<Option<<Self::Finder as Finder>::Element>>
    where
        <Self::Finder as Finder>::Element: Displayed,
    {
        self.waiter().wait_for_visible(locator)
    }

    /// Whether the element is present and displayed right now.
    fn is_visible(&self, locator: &Locator) -> EsperarResult<bool>
    where
        <Self::Finder as Finder>::Element: Displayed,
    {
        let options = self.wait_options().with_timeout(Duration::ZERO);
        let waiter = Waiter::with_options(self.finder(), options);
        Ok(waiter.wait_for_visible(locator)?.is_some())
    }

    /// Assert the element is gone or undisplayed within the instance
    /// timeout.
    fn assert_hidden(&self, locator: &Locator) -> EsperarResult<()>
    where
        <Self::Finder as Finder>::Element: Displayed,
    {
        self.waiter().assert_hidden(locator)
    }

    /// Wait for the element to be gone or undisplayed; `false` on timeout.
    fn wait_for_hidden(&self, locator: &Locator) -> EsperarResult<bool>
    where
        <Self::Finder as Finder>::Element: Displayed,
    {
        self.waiter().wait_for_hidden(locator)
    }

    // ---- multiple locators ---------------------------------------------

    /// Assert every locator resolves within one probe pass; returns the
    /// elements in locator order.
    fn assert_all_present(
        &self,
        locators: &[Locator],
    ) -> EsperarResult<Vec<<Self::Finder as Finder>::Element>> {
        self.waiter().assert_all_present(locators)
    }

    /// Assert at least one locator resolves; returns the first match.
    fn assert_any_present(
        &self,
        locators: &[Locator],
    ) -> EsperarResult<<Self::Finder as Finder>::Element> {
        self.waiter().assert_any_present(locators)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::finder::{ScriptedElement, ScriptedFinder, Step};
    use crate::result::EsperarError;
    use crate::wait::ConditionKind;

    /// A screen under test, with fast instance-tier options.
    struct ComposeScreen<'d> {
        finder: &'d ScriptedFinder,
    }

    impl ComposeScreen<'_> {
        fn send_button() -> Locator {
            Locator::id("send")
        }

        fn sending_spinner() -> Locator {
            Locator::id("sending")
        }

        // A composite wait, built from the trait's primitives.
        fn wait_for_screen_loaded(&self) -> EsperarResult<()> {
            self.assert_present(&Self::send_button())?;
            Ok(())
        }
    }

    impl PageObject for ComposeScreen<'_> {
        type Finder = ScriptedFinder;

        fn finder(&self) -> &ScriptedFinder {
            self.finder
        }

        fn wait_options(&self) -> WaitOptions {
            WaitOptions::new()
                .with_timeout(Duration::from_millis(200))
                .with_poll_interval(Duration::from_millis(10))
                .with_warn_after(None)
        }
    }

    #[test]
    fn test_page_name_defaults_to_type_name() {
        let finder = ScriptedFinder::new();
        let screen = ComposeScreen { finder: &finder };
        assert!(screen.page_name().contains("ComposeScreen"));
    }

    #[test]
    fn test_composite_wait_built_from_primitives() {
        let finder = ScriptedFinder::new()
            .then(Step::Absent)
            .then(Step::One(ScriptedElement::new("send")));
        let screen = ComposeScreen { finder: &finder };

        screen.wait_for_screen_loaded().unwrap();
        assert_eq!(finder.calls(), 2);
    }

    #[test]
    fn test_assert_present_uses_instance_options() {
        let finder = ScriptedFinder::new(); // never resolves
        let screen = ComposeScreen { finder: &finder };

        let err = screen.assert_present(&ComposeScreen::send_button()).unwrap_err();
        match err {
            EsperarError::AssertionTimeout { timeout, kind, .. } => {
                assert_eq!(timeout, Duration::from_millis(200));
                assert_eq!(kind, ConditionKind::Presence);
            }
            other => panic!("expected AssertionTimeout, got {other:?}"),
        }
    }

    #[test]
    fn test_call_tier_beats_instance_tier() {
        let finder = ScriptedFinder::new();
        let screen = ComposeScreen { finder: &finder };

        let err = screen
            .assert_present_within(&ComposeScreen::send_button(), Duration::from_millis(30))
            .unwrap_err();
        match err {
            EsperarError::AssertionTimeout { timeout, .. } => {
                assert_eq!(timeout, Duration::from_millis(30));
            }
            other => panic!("expected AssertionTimeout, got {other:?}"),
        }
    }

    #[test]
    fn test_is_present_probes_once_without_waiting() {
        let finder = ScriptedFinder::new();
        let screen = ComposeScreen { finder: &finder };

        assert!(!screen.is_present(&ComposeScreen::send_button()).unwrap());
        assert_eq!(finder.calls(), 1);
    }

    #[test]
    fn test_is_absent_probes_once_without_waiting() {
        let finder = ScriptedFinder::replaying(Step::One(ScriptedElement::new("sending")));
        let screen = ComposeScreen { finder: &finder };

        assert!(!screen.is_absent(&ComposeScreen::sending_spinner()).unwrap());
        assert_eq!(finder.calls(), 1);
    }

    #[test]
    fn test_every_wait_performs_a_fresh_lookup() {
        // Two consecutive assertions both hit the driver; nothing is cached.
        let finder = ScriptedFinder::replaying(Step::One(ScriptedElement::new("send")));
        let screen = ComposeScreen { finder: &finder };

        screen.assert_present(&ComposeScreen::send_button()).unwrap();
        screen.assert_present(&ComposeScreen::send_button()).unwrap();
        assert_eq!(finder.calls(), 2);
    }

    #[test]
    fn test_spinner_absence_after_send() {
        let finder = ScriptedFinder::new()
            .then(Step::Many(vec![ScriptedElement::new("sending")]))
            .then(Step::Absent);
        let screen = ComposeScreen { finder: &finder };

        screen.assert_absent(&ComposeScreen::sending_spinner()).unwrap();
    }

    #[test]
    fn test_state_wait_through_page_object() {
        let finder = ScriptedFinder::replaying(Step::One(
            ScriptedElement::new("status").with_text("Sent"),
        ));
        let screen = ComposeScreen { finder: &finder };

        let element = screen
            .assert_state(&Locator::id("status"), |el| el.text == "Sent")
            .unwrap();
        assert_eq!(element.text, "Sent");
    }

    #[test]
    fn test_visibility_vocabulary() {
        let finder = ScriptedFinder::replaying(Step::One(
            ScriptedElement::new("banner").with_displayed(false),
        ));
        let screen = ComposeScreen { finder: &finder };

        assert!(!screen.is_visible(&Locator::id("banner")).unwrap());
        screen.assert_hidden(&Locator::id("banner")).unwrap();
    }

    #[test]
    fn test_any_present_for_alternate_layouts() {
        let finder = ScriptedFinder::new()
            .then(Step::Absent)
            .then(Step::One(ScriptedElement::new("send-compact")));
        let screen = ComposeScreen { finder: &finder };

        let element = screen
            .assert_any_present(&[Locator::id("send"), Locator::id("send-compact")])
            .unwrap();
        assert_eq!(element.id, "send-compact");
    }
}
