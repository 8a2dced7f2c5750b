//! Crate-level error umbrella.

use thiserror::Error;

use crate::config::ConfigError;
use crate::corpus::IngestionError;
use crate::embedding::{EmbeddingError, RerankerError};
use crate::generation::GenerationError;
use crate::index::StorageError;
use crate::vectordb::VectorDbError;

/// Failure of one of the model backends.
///
/// During batch evaluation these are recorded per case instead of aborting the run.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("embedding backend: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("reranking backend: {0}")]
    Reranker(#[from] RerankerError),

    #[error("generation backend: {0}")]
    Generation(#[from] GenerationError),
}

/// Error returned by index, retrieval and query operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl PipelineError {
    /// Returns `true` for per-request backend failures.
    pub fn is_backend(&self) -> bool {
        matches!(self, PipelineError::Backend(_))
    }
}

impl From<EmbeddingError> for PipelineError {
    fn from(err: EmbeddingError) -> Self {
        PipelineError::Backend(err.into())
    }
}

impl From<RerankerError> for PipelineError {
    fn from(err: RerankerError) -> Self {
        PipelineError::Backend(err.into())
    }
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        PipelineError::Backend(err.into())
    }
}

impl From<VectorDbError> for PipelineError {
    fn from(err: VectorDbError) -> Self {
        PipelineError::Storage(err.into())
    }
}

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
