use std::path::PathBuf;

use crate::embedding::utils::missing_model_file;

pub const MAX_SEQ_LEN: usize = crate::constants::DEFAULT_MAX_SEQ_LEN;

#[derive(Debug, Clone)]
pub struct CrossEncoderConfig {
    /// Model directory; `None` selects the lexical stub.
    pub model_path: Option<PathBuf>,

    pub max_seq_len: usize,
}

impl Default for CrossEncoderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: MAX_SEQ_LEN,
        }
    }
}

impl CrossEncoderConfig {
    pub const ENV_MODEL_PATH: &'static str = "LAWLENS_RERANK_MODEL_PATH";

    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_seq_len == 0 {
            return Err("max_seq_len must be greater than zero".to_string());
        }

        if let Some(ref path) = self.model_path {
            if path.as_os_str().is_empty() {
                return Err("model_path cannot be empty when provided".to_string());
            }
            if !path.is_dir() {
                return Err(format!("reranker model path not found: {}", path.display()));
            }
            if let Some(file) = missing_model_file(path) {
                return Err(format!("missing {} in {}", file, path.display()));
            }
        }

        Ok(())
    }

    pub fn from_env() -> Self {
        let model_path = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            model_path,
            ..Default::default()
        }
    }
}
