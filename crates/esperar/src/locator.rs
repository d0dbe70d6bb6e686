//! Locator values: how to find a UI element, independent of driver.
//!
//! A locator is data, not behavior. Whether a given strategy is supported is
//! only known to the driver behind the `Finder` capability, so validation
//! happens at lookup time, never at construction.

use serde::{Deserialize, Serialize};

/// How a locator's value should be interpreted by a driver.
///
/// Covers the common strategies of web and mobile automation engines. A
/// driver recognizes a subset; passing an unrecognized strategy fails the
/// lookup with `FindError::UnsupportedStrategy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// CSS selector (web)
    Css,
    /// XPath expression (web and mobile)
    XPath,
    /// Element id attribute
    Id,
    /// Element name attribute
    Name,
    /// Visible text content
    Text,
    /// Test id attribute (data-testid or equivalent)
    TestId,
    /// Accessibility identifier (mobile)
    AccessibilityId,
}

impl Strategy {
    /// Stable string form, used in locator descriptions and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::Id => "id",
            Self::Name => "name",
            Self::Text => "text",
            Self::TestId => "test-id",
            Self::AccessibilityId => "accessibility-id",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An opaque description of how to find a UI element: strategy plus value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Create a locator from a strategy and value.
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Create a CSS selector locator.
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::new(Strategy::Css, value)
    }

    /// Create an XPath locator.
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// Create an id-attribute locator.
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::new(Strategy::Id, value)
    }

    /// Create a name-attribute locator.
    #[must_use]
    pub fn name(value: impl Into<String>) -> Self {
        Self::new(Strategy::Name, value)
    }

    /// Create a visible-text locator.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(Strategy::Text, value)
    }

    /// Create a test-id locator.
    #[must_use]
    pub fn test_id(value: impl Into<String>) -> Self {
        Self::new(Strategy::TestId, value)
    }

    /// Create an accessibility-id locator.
    #[must_use]
    pub fn accessibility_id(value: impl Into<String>) -> Self {
        Self::new(Strategy::AccessibilityId, value)
    }

    /// The lookup strategy.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The strategy-specific value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}
