//! Error types for rank-fusion.

use std::fmt;

/// Errors that can occur while fusing score lists.
#[derive(Debug, Clone, PartialEq)]
pub enum FusionError {
    /// `weighted_sum` was called with score lists of different lengths.
    LengthMismatch { len1: usize, len2: usize },
}

impl fmt::Display for FusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FusionError::LengthMismatch { len1, len2 } => write!(
                f,
                "score lists must have the same length, got {len1} and {len2}"
            ),
        }
    }
}

impl std::error::Error for FusionError {}
