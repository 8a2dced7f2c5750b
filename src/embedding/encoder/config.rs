use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::missing_model_file;

/// Default encoder output dimension.
pub const ENCODER_EMBEDDING_DIM: usize = crate::constants::DEFAULT_EMBEDDING_DIM;

/// Default encoder max sequence length.
pub const ENCODER_MAX_SEQ_LEN: usize = crate::constants::DEFAULT_MAX_SEQ_LEN;

#[derive(Debug, Clone)]
/// Configuration for [`BertEncoder`](super::BertEncoder).
pub struct EncoderConfig {
    /// Model directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Max tokens per input.
    pub max_seq_len: usize,
    /// Output embedding dimension (must equal the model hidden size).
    pub embedding_dim: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: ENCODER_MAX_SEQ_LEN,
            embedding_dim: ENCODER_EMBEDDING_DIM,
            testing_stub: false,
        }
    }
}

impl EncoderConfig {
    /// Env var used to locate the encoder model directory.
    pub const ENV_MODEL_PATH: &'static str = "LAWLENS_EMBED_MODEL_PATH";

    /// Loads config from the environment, falling back to stub mode when unset.
    pub fn from_env() -> Self {
        std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Self::new)
            .unwrap_or_else(Self::stub)
    }

    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    /// Validates required fields for the selected mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be greater than zero".to_string(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        if self.testing_stub {
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        if let Some(file) = missing_model_file(&self.model_dir) {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.join(file),
            });
        }

        Ok(())
    }
}
