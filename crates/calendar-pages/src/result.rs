//! Result and error types for calendar page objects.

use thiserror::Error;

/// Result type for page object operations
pub type PageResult<T> = Result<T, PageError>;

/// Errors raised while driving the calendar app
#[derive(Debug, Error)]
pub enum PageError {
    /// Selector resolved to nothing within the search timeout
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector that failed to resolve
        selector: String,
    },

    /// A wait condition never became true
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the condition
        waited_for: String,
    },

    /// Caller passed an unusable argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// A page-level assertion did not hold
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// The remote session reported a failure
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// A remote script returned something we could not interpret
    #[error("Script error: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl PageError {
    /// Build an [`PageError::ElementNotFound`] for a selector
    #[must_use]
    pub fn not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Build an [`PageError::InvalidArgument`]
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Build an [`PageError::AssertionFailed`]
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// True for [`PageError::Timeout`]
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
