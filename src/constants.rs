//! Cross-cutting, shared constants.
//!
//! Pipeline bounds (top-K, top-N, relevance threshold) have their defaults here, but the
//! values actually used at runtime always come from [`Config`](crate::config::Config).
//!
//! # Dimension Invariants
//!
//! The embedding dimension is fixed when the encoder loads and must equal the dimension the
//! vector collection was created with. Use [`validate_embedding_dim`] at the index boundary
//! to catch mismatches before anything is written.

/// Hidden size of the BERT-base sentence encoders this crate targets.
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Token budget for both the sentence encoder and the cross-encoder.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Candidates returned by the first-stage similarity query.
pub const DEFAULT_TOP_K: usize = 20;

/// Candidates kept by the cross-encoder.
pub const DEFAULT_RERANK_TOP_N: usize = 5;

/// Minimum rerank score a clause must strictly exceed to be cited.
pub const DEFAULT_MIN_RERANK_SCORE: f32 = 0.4;

/// Dense weight used when hybrid retrieval is selected without an explicit alpha.
pub const DEFAULT_HYBRID_ALPHA: f32 = 0.5;

/// Retrieval fetches `top_k * CANDIDATE_OVERFETCH` dense candidates, re-sorts them with the
/// ingestion-order tie-break (and hybrid blending, when enabled), then truncates to `top_k`.
pub const CANDIDATE_OVERFETCH: usize = 3;

/// Clauses embedded per encoder call while building the index.
pub const EMBED_BATCH_SIZE: usize = 32;

pub const DEFAULT_TEMPERATURE: f64 = 0.3;

pub const DEFAULT_COLLECTION_NAME: &str = "chinese_labor_laws";

/// `articleLabel` assigned when a clause title has no whitespace separator.
pub const UNKNOWN_ARTICLE: &str = "unknown";

/// `contentType` recorded on every clause produced from the statute corpus.
pub const LEGAL_ARTICLE_CONTENT_TYPE: &str = "legal_article";

/// Error returned when an embedding dimension check fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimValidationError {
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,
    /// Encoder output does not match the collection dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Validates that a runtime embedding dimension matches the collection dimension.
///
/// # Example
///
/// ```
/// use lawlens::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(1024, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rerank_top_n_within_top_k() {
        assert!(DEFAULT_RERANK_TOP_N <= DEFAULT_TOP_K);
    }

    #[test]
    fn test_validate_embedding_dim_match() {
        assert!(validate_embedding_dim(768, 768).is_ok());
    }

    #[test]
    fn test_validate_embedding_dim_mismatch() {
        assert_eq!(
            validate_embedding_dim(384, 768),
            Err(DimValidationError::DimensionMismatch {
                expected: 768,
                actual: 384
            })
        );
    }

    #[test]
    fn test_validate_embedding_dim_zero() {
        assert_eq!(
            validate_embedding_dim(0, 0),
            Err(DimValidationError::ZeroDimension)
        );
    }

    #[test]
    fn test_error_display() {
        let err = DimValidationError::DimensionMismatch {
            expected: 768,
            actual: 384,
        };
        assert!(err.to_string().contains("768"));
        assert!(err.to_string().contains("384"));
    }
}
