//! Error types for rank-retrieve.

use std::fmt;

/// Errors that can occur during retrieval operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrieveError {
    /// A metadata list's length did not match the passage list's length.
    InvalidInput(String),
    /// Dimension mismatch between query and documents, or between a newly
    /// encoded passage and the dimension already established by the index.
    DimensionMismatch { expected: usize, got: usize },
    /// The encoder or reader backend failed to load or returned a
    /// structural error (malformed output, wrong shape, etc).
    ModelUnavailable(String),
    /// A single passage failed to encode. Fatal on the ingestion path;
    /// the caller is expected to roll back the whole batch.
    EncoderFailure(String),
    /// Other error (for extensibility).
    Other(String),
}

impl fmt::Display for RetrieveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrieveError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            RetrieveError::DimensionMismatch { expected, got } => {
                write!(f, "dimension mismatch: expected {expected}, got {got}")
            }
            RetrieveError::ModelUnavailable(msg) => write!(f, "model unavailable: {msg}"),
            RetrieveError::EncoderFailure(msg) => write!(f, "encoder failure: {msg}"),
            RetrieveError::Other(msg) => write!(f, "error: {msg}"),
        }
    }
}

impl std::error::Error for RetrieveError {}
