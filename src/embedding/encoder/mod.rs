//! BERT sentence encoder (mean pooling, L2-normalized).
//!
//! Use [`EncoderConfig::stub`] for tests/examples without model files. The stub hashes
//! lexical terms into buckets, so texts sharing terms get positive cosine similarity.

/// Encoder configuration.
pub mod config;


pub use config::{ENCODER_EMBEDDING_DIM, ENCODER_MAX_SEQ_LEN, EncoderConfig};

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::TextEmbedder;
use crate::embedding::bert::BertSentenceModel;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::load_truncating_tokenizer;
use crate::hashing::hash_to_u64;
use crate::text::tokenize;

enum EncoderBackend {
    Model {
        model: BertSentenceModel,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Embedding backend used for both indexing and querying.
pub struct BertEncoder {
    backend: EncoderBackend,
    config: EncoderConfig,
}

impl std::fmt::Debug for BertEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl BertEncoder {
    /// Loads the encoder from a config (stub mode is supported).
    pub fn load(config: EncoderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Encoder running in STUB mode (lexical hashing, testing only)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
            });
        }

        let device = select_device();
        debug!(?device, "Selected compute device for encoder");

        let model = BertSentenceModel::load(&config.model_dir, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                model_dir: config.model_dir.clone(),
                reason: e.to_string(),
            }
        })?;

        if model.hidden_size() != config.embedding_dim {
            return Err(EmbeddingError::DimensionMismatch {
                expected: config.embedding_dim,
                actual: model.hidden_size(),
            });
        }

        let tokenizer =
            load_truncating_tokenizer(&config.model_dir, config.max_seq_len).map_err(|e| {
                EmbeddingError::ModelLoadFailed {
                    model_dir: config.model_dir.clone(),
                    reason: format!("tokenizer: {e}"),
                }
            })?;

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            "Encoder model loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer,
                device,
            },
            config,
        })
    }

    /// Shorthand for `load(EncoderConfig::stub())`.
    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(EncoderConfig::stub())
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    fn embed_with_model(
        &self,
        text: &str,
        model: &BertSentenceModel,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        if encoding.get_ids().is_empty() {
            return Ok(vec![0.0; self.config.embedding_dim]);
        }

        debug!(
            text_len = text.len(),
            token_count = encoding.get_ids().len(),
            "Encoding text"
        );

        let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let pooled = model
            .forward_pooled(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Encoder forward pass failed: {}", e),
            })?;

        let embedding = pooled.squeeze(0)?.to_vec1::<f32>()?;
        Ok(l2_normalize(embedding))
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        let dim = self.config.embedding_dim;
        let mut embedding = vec![0.0f32; dim];

        for token in tokenize(text) {
            let bucket = (hash_to_u64(token.as_bytes()) % dim as u64) as usize;
            embedding[bucket] += 1.0;
        }

        l2_normalize(embedding)
    }
}

impl TextEmbedder for BertEncoder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.embed_with_model(text, model, tokenizer, device),
            EncoderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }
}

fn l2_normalize(mut embedding: Vec<f32>) -> Vec<f32> {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}
