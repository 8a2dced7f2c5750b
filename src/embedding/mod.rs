//! Embedding + model utilities.
//!
//! - [`encoder`] provides sentence embeddings behind [`TextEmbedder`].
//! - [`reranker`] provides cross-encoder relevance scores behind [`RelevanceScorer`].

/// BERT wrappers shared by the encoder and the cross-encoder.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Sentence encoder.
pub mod encoder;
mod error;
/// Cross-encoder reranking backend.
pub mod reranker;
/// Tokenizer/model loading helpers.
pub mod utils;

pub use encoder::{BertEncoder, ENCODER_EMBEDDING_DIM, ENCODER_MAX_SEQ_LEN, EncoderConfig};
pub use error::EmbeddingError;
pub use reranker::{CrossEncoder, CrossEncoderConfig, RelevanceScorer, RerankerError};
#[cfg(any(test, feature = "mock"))]
pub use reranker::MockRelevanceScorer;

/// Embedding backend contract: text in, fixed-length vector out.
///
/// The dimension is fixed when the backend loads and never changes afterwards.
pub trait TextEmbedder: Send + Sync {
    /// Embeds a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds several texts, preserving order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Output dimension of every vector this backend produces.
    fn embedding_dim(&self) -> usize;
}
