//! Top-level error type composing the three lower crates' errors.

use std::fmt;

use rank_fusion::FusionError;
use rank_qa::QaError;
use rank_retrieve::RetrieveError;

#[derive(Debug, Clone, PartialEq)]
pub enum RankRankError {
    Retrieve(RetrieveError),
    Fusion(FusionError),
    Qa(QaError),
    /// A caller-facing precondition was violated (e.g. QA requested
    /// without a configured reader).
    InvalidInput(String),
}

impl fmt::Display for RankRankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankRankError::Retrieve(e) => write!(f, "retrieval error: {e}"),
            RankRankError::Fusion(e) => write!(f, "fusion error: {e}"),
            RankRankError::Qa(e) => write!(f, "qa error: {e}"),
            RankRankError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for RankRankError {}

impl From<RetrieveError> for RankRankError {
    fn from(e: RetrieveError) -> Self {
        RankRankError::Retrieve(e)
    }
}

impl From<FusionError> for RankRankError {
    fn from(e: FusionError) -> Self {
        RankRankError::Fusion(e)
    }
}

impl From<QaError> for RankRankError {
    fn from(e: QaError) -> Self {
        RankRankError::Qa(e)
    }
}
