//! Error types for rank-qa.

use std::fmt;

/// Errors that can occur while reading or reporting answer spans.
#[derive(Debug, Clone, PartialEq)]
pub enum QaError {
    /// The reader/model backend failed to load or returned a structural
    /// error. Fatal: unlike a single passage's read failure, this is not
    /// swallowed.
    ModelUnavailable(String),
    /// Other error (for extensibility).
    Other(String),
}

impl fmt::Display for QaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QaError::ModelUnavailable(msg) => write!(f, "model unavailable: {msg}"),
            QaError::Other(msg) => write!(f, "error: {msg}"),
        }
    }
}

impl std::error::Error for QaError {}
