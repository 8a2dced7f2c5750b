use std::path::PathBuf;

use thiserror::Error;

/// Cross-encoder failures.
#[derive(Debug, Error)]
pub enum RerankerError {
    #[error("failed to load cross-encoder from {model_dir}: {reason}")]
    ModelLoadFailed { model_dir: PathBuf, reason: String },

    #[error("failed to tokenize query/clause pair: {reason}")]
    TokenizationFailed { reason: String },

    #[error("cross-encoder inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("invalid cross-encoder configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The backend broke the one-score-per-candidate contract.
    #[error("reranker returned {actual} scores for {expected} candidates")]
    ScoreCountMismatch { expected: usize, actual: usize },
}

impl From<candle_core::Error> for RerankerError {
    fn from(err: candle_core::Error) -> Self {
        Self::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
