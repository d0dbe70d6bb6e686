//! Esperar: technology-independent synchronization and assertions for UI
//! test automation.
//!
//! Esperar (Spanish: "to wait/expect") is the reusable core under
//! page-object test suites: it polls a UI-element locator until a condition
//! (presence, absence, or a predicate over element state) holds or a
//! deadline expires, and exposes that as both blocking assertions (fail the
//! test on timeout) and non-blocking waits (return a boolean or an optional
//! element). It is driver-agnostic: web and mobile automation engines plug
//! in behind one small `Finder` capability.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    ESPERAR Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ PageObject │    │ Waiter     │    │ Finder     │            │
//! │   │ (screens)  │───►│ (poll +    │───►│ (web or    │            │
//! │   │            │    │  deadline) │    │  mobile)   │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A keyword-table runner sits above page objects and maps human-readable
//! phrases onto their stable `assert_` / `is_` / `wait_for_` method names;
//! that mapping, like the concrete drivers, lives outside this crate.
//!
//! Waits are single-threaded and blocking by design: one wait occupies the
//! calling thread until success or deadline, matching the one-session,
//! one-thread execution model of UI automation. Parallel test cases need
//! independent sessions, each with its own Finder.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Deadline arithmetic for wait operations
pub mod clock;

/// Process-wide wait defaults (the bottom override tier)
pub mod config;

/// The Finder capability: the driver boundary this crate consumes
pub mod finder;

/// Recovery handlers consulted while a blocking wait is unsatisfied
pub mod handlers;

/// Locator values: strategy plus value, validated at lookup time
pub mod locator;

/// Page Object support: one value per logical screen, speaking waits
pub mod page_object;

/// The poll loop every waiter is built on
pub mod poller;

/// Result and error types
pub mod result;

/// Presence, absence, and predicate waiters over a Finder
pub mod wait;

pub use clock::Deadline;
pub use finder::{Displayed, FindError, Finder, ScriptedElement, ScriptedFinder, Step};
pub use handlers::{Handler, HandlerSet};
pub use locator::{Locator, Strategy};
pub use page_object::PageObject;
pub use poller::{poll, PollOutcome};
pub use result::{EsperarError, EsperarResult};
pub use wait::{ConditionKind, WaitOptions, Waiter};
