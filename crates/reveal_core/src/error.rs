//! Error types shared by every Reveal crate

use thiserror::Error;

/// Errors raised by the trigger controller, the style generator, and the host seam
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevealError {
    /// A selector string could not be parsed
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A well-formed selector the host cannot evaluate
    #[error("unsupported selector '{selector}': {reason}")]
    UnsupportedSelector { selector: String, reason: String },

    /// The host cannot observe element visibility
    #[error("host does not provide visibility observation")]
    MissingObservationSupport,

    /// Visibility threshold outside 0.0..=1.0
    #[error("visibility threshold must be within 0.0..=1.0, got {0}")]
    InvalidThreshold(f32),

    /// A CSS length could not be parsed
    #[error("invalid CSS length: {0}")]
    InvalidLength(String),

    /// Serialized configuration could not be read
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RevealError {
    pub(crate) fn invalid_selector(selector: &str, reason: impl Into<String>) -> Self {
        RevealError::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported_selector(selector: &str, reason: impl Into<String>) -> Self {
        RevealError::UnsupportedSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for Reveal operations
pub type Result<T> = std::result::Result<T, RevealError>;
