use std::path::PathBuf;
use thiserror::Error;

/// Sentence-encoder failures.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The model directory or one of its required files is absent.
    #[error("encoder model file not found: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load encoder from {model_dir}: {reason}")]
    ModelLoadFailed { model_dir: PathBuf, reason: String },

    /// The loaded model's hidden size differs from the configured embedding dimension.
    #[error("encoder produces {actual}-dimensional vectors, configured for {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("invalid encoder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        Self::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
