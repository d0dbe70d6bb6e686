//! Result and error types for Esperar.

use std::time::Duration;
use thiserror::Error;

use crate::finder::FindError;
use crate::wait::ConditionKind;

/// Result type for Esperar operations
pub type EsperarResult<T> = Result<T, EsperarError>;

/// Errors that can occur in Esperar
#[derive(Debug, Error)]
pub enum EsperarError {
    /// A blocking wait ran out of time before its condition held
    #[error("waiting for {kind} of {locator} timed out after {timeout:?}")]
    AssertionTimeout {
        /// Description of the locator (or locators) under wait
        locator: String,
        /// Timeout the wait was given
        timeout: Duration,
        /// Condition the wait was checking
        kind: ConditionKind,
    },

    /// A fatal lookup error, propagated unchanged from the driver boundary.
    ///
    /// `FindError::NotFound` never reaches callers through this variant: the
    /// waiters retry it internally until their deadline.
    #[error(transparent)]
    Find(#[from] FindError),
}

impl EsperarError {
    /// Whether this error is a wait timeout (as opposed to a configuration
    /// or driver failure)
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::AssertionTimeout { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::locator::Strategy;

    #[test]
    fn test_assertion_timeout_display() {
        let err = EsperarError::AssertionTimeout {
            locator: "css=button.submit".to_string(),
            timeout: Duration::from_millis(50),
            kind: ConditionKind::Presence,
        };
        let msg = err.to_string();
        assert!(msg.contains("presence"));
        assert!(msg.contains("css=button.submit"));
        assert!(msg.contains("50ms"));
    }

    #[test]
    fn test_find_error_passes_through_unchanged() {
        let err: EsperarError = FindError::UnsupportedStrategy {
            strategy: Strategy::XPath,
        }
        .into();
        assert!(!err.is_timeout());
        assert_eq!(
            err.to_string(),
            FindError::UnsupportedStrategy {
                strategy: Strategy::XPath
            }
            .to_string()
        );
    }

    #[test]
    fn test_is_timeout() {
        let timeout = EsperarError::AssertionTimeout {
            locator: "id=spinner".to_string(),
            timeout: Duration::from_secs(1),
            kind: ConditionKind::Absence,
        };
        assert!(timeout.is_timeout());
    }
}
