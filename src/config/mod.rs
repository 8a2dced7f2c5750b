//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `LAWLENS_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_HYBRID_ALPHA, DEFAULT_MIN_RERANK_SCORE,
    DEFAULT_RERANK_TOP_N, DEFAULT_TEMPERATURE, DEFAULT_TOP_K,
};
use crate::embedding::{CrossEncoderConfig, EncoderConfig};
use crate::generation::{DEFAULT_LLM_MODEL, GeneratorConfig};
use crate::index::IndexConfig;
use crate::retrieval::RetrievalMode;

/// Default Qdrant URL used when `LAWLENS_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Benchmark cases evaluated concurrently by default.
pub const DEFAULT_EVAL_CONCURRENCY: usize = 4;

/// Application configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `LAWLENS_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of corpus JSON files. Default: `./data`.
    pub data_dir: PathBuf,

    /// Directory holding the persisted document store. Default: `./storage`.
    pub persist_dir: PathBuf,

    /// Vector collection name. Default: `chinese_labor_laws`.
    pub collection_name: String,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Sentence encoder model directory; stub embeddings when unset.
    pub embed_model_path: Option<PathBuf>,

    /// Cross-encoder model directory; lexical stub scores when unset.
    pub rerank_model_path: Option<PathBuf>,

    /// First-stage candidate count. Default: `20`.
    pub top_k: usize,

    /// Candidates kept after reranking. Default: `5`.
    pub rerank_top_n: usize,

    /// Rerank score a clause must strictly exceed to be cited. Default: `0.4`.
    pub min_rerank_score: f32,

    /// Dense or hybrid retrieval. Default: dense.
    pub retrieval_mode: RetrievalMode,

    /// Chat model name.
    pub llm_model: String,

    /// OpenAI-compatible endpoint for the chat model.
    pub llm_api_base: Option<String>,

    /// API key for `llm_api_base`.
    pub llm_api_key: Option<String>,

    /// Sampling temperature. Default: `0.3`.
    pub temperature: f64,

    /// Retrieval benchmark file. Default: `./benchmarks/retrieval.json`.
    pub retrieval_benchmark: PathBuf,

    /// End-to-end benchmark file. Default: `./benchmarks/end_to_end.json`.
    pub e2e_benchmark: PathBuf,

    /// Benchmark cases evaluated concurrently. Default: `4`.
    pub eval_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            persist_dir: PathBuf::from("./storage"),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            embed_model_path: None,
            rerank_model_path: None,
            top_k: DEFAULT_TOP_K,
            rerank_top_n: DEFAULT_RERANK_TOP_N,
            min_rerank_score: DEFAULT_MIN_RERANK_SCORE,
            retrieval_mode: RetrievalMode::Dense,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_api_base: None,
            llm_api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            retrieval_benchmark: PathBuf::from("./benchmarks/retrieval.json"),
            e2e_benchmark: PathBuf::from("./benchmarks/end_to_end.json"),
            eval_concurrency: DEFAULT_EVAL_CONCURRENCY,
        }
    }
}

impl Config {
    const ENV_DATA_DIR: &'static str = "LAWLENS_DATA_DIR";
    const ENV_PERSIST_DIR: &'static str = "LAWLENS_PERSIST_DIR";
    const ENV_COLLECTION: &'static str = "LAWLENS_COLLECTION";
    const ENV_QDRANT_URL: &'static str = "LAWLENS_QDRANT_URL";
    const ENV_TOP_K: &'static str = "LAWLENS_TOP_K";
    const ENV_RERANK_TOP_N: &'static str = "LAWLENS_RERANK_TOP_N";
    const ENV_MIN_RERANK_SCORE: &'static str = "LAWLENS_MIN_RERANK_SCORE";
    const ENV_RETRIEVAL_MODE: &'static str = "LAWLENS_RETRIEVAL_MODE";
    const ENV_HYBRID_ALPHA: &'static str = "LAWLENS_HYBRID_ALPHA";
    const ENV_LLM_MODEL: &'static str = "LAWLENS_LLM_MODEL";
    const ENV_LLM_API_BASE: &'static str = "LAWLENS_LLM_API_BASE";
    const ENV_LLM_API_KEY: &'static str = "LAWLENS_LLM_API_KEY";
    const ENV_TEMPERATURE: &'static str = "LAWLENS_TEMPERATURE";
    const ENV_RETRIEVAL_BENCHMARK: &'static str = "LAWLENS_RETRIEVAL_BENCHMARK";
    const ENV_E2E_BENCHMARK: &'static str = "LAWLENS_E2E_BENCHMARK";
    const ENV_EVAL_CONCURRENCY: &'static str = "LAWLENS_EVAL_CONCURRENCY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            data_dir: Self::parse_path_from_env(Self::ENV_DATA_DIR, defaults.data_dir),
            persist_dir: Self::parse_path_from_env(Self::ENV_PERSIST_DIR, defaults.persist_dir),
            collection_name: Self::parse_string_from_env(
                Self::ENV_COLLECTION,
                defaults.collection_name,
            ),
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            embed_model_path: Self::parse_optional_from_env(EncoderConfig::ENV_MODEL_PATH)
                .map(PathBuf::from),
            rerank_model_path: Self::parse_optional_from_env(CrossEncoderConfig::ENV_MODEL_PATH)
                .map(PathBuf::from),
            top_k: Self::parse_from_env(Self::ENV_TOP_K, defaults.top_k)?,
            rerank_top_n: Self::parse_from_env(Self::ENV_RERANK_TOP_N, defaults.rerank_top_n)?,
            min_rerank_score: Self::parse_from_env(
                Self::ENV_MIN_RERANK_SCORE,
                defaults.min_rerank_score,
            )?,
            retrieval_mode: Self::parse_retrieval_mode_from_env()?,
            llm_model: Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm_model),
            llm_api_base: Self::parse_optional_from_env(Self::ENV_LLM_API_BASE),
            llm_api_key: Self::parse_optional_from_env(Self::ENV_LLM_API_KEY),
            temperature: Self::parse_from_env(Self::ENV_TEMPERATURE, defaults.temperature)?,
            retrieval_benchmark: Self::parse_path_from_env(
                Self::ENV_RETRIEVAL_BENCHMARK,
                defaults.retrieval_benchmark,
            ),
            e2e_benchmark: Self::parse_path_from_env(
                Self::ENV_E2E_BENCHMARK,
                defaults.e2e_benchmark,
            ),
            eval_concurrency: Self::parse_from_env(
                Self::ENV_EVAL_CONCURRENCY,
                defaults.eval_concurrency,
            )?,
        })
    }

    /// Validates pipeline bounds and paths (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::OutOfRange {
                name: "top_k",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.rerank_top_n == 0 || self.rerank_top_n > self.top_k {
            return Err(ConfigError::OutOfRange {
                name: "rerank_top_n",
                reason: format!(
                    "must be within 1..={} (top_k), got {}",
                    self.top_k, self.rerank_top_n
                ),
            });
        }

        if !self.min_rerank_score.is_finite() {
            return Err(ConfigError::OutOfRange {
                name: "min_rerank_score",
                reason: "must be finite".to_string(),
            });
        }

        let alpha = self.retrieval_mode.alpha();
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return Err(ConfigError::OutOfRange {
                name: "hybrid_alpha",
                reason: format!("must be within [0, 1], got {alpha}"),
            });
        }

        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::OutOfRange {
                name: "temperature",
                reason: format!("must be within [0, 2], got {}", self.temperature),
            });
        }

        if self.eval_concurrency == 0 {
            return Err(ConfigError::OutOfRange {
                name: "eval_concurrency",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.collection_name.trim().is_empty() {
            return Err(ConfigError::OutOfRange {
                name: "collection_name",
                reason: "must not be empty".to_string(),
            });
        }

        for (name, dir) in [("data_dir", &self.data_dir), ("persist_dir", &self.persist_dir)] {
            if dir.exists() && !dir.is_dir() {
                return Err(ConfigError::NotADirectory {
                    name,
                    path: dir.clone(),
                });
            }
        }

        if let Some(path) = &self.embed_model_path {
            Self::require_dir("embed_model_path", path)?;
        }
        if let Some(path) = &self.rerank_model_path {
            Self::require_dir("rerank_model_path", path)?;
        }

        Ok(())
    }

    /// Checks that both benchmark files exist (only needed by the evaluation mode).
    pub fn validate_benchmarks(&self) -> Result<(), ConfigError> {
        for (name, path) in [
            ("retrieval_benchmark", &self.retrieval_benchmark),
            ("e2e_benchmark", &self.e2e_benchmark),
        ] {
            if !path.exists() {
                return Err(ConfigError::PathNotFound {
                    name,
                    path: path.clone(),
                });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile {
                    name,
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }

    /// Encoder settings; stub mode when no model path is configured.
    pub fn encoder_config(&self) -> EncoderConfig {
        match &self.embed_model_path {
            Some(path) => EncoderConfig::new(path),
            None => EncoderConfig::stub(),
        }
    }

    /// Cross-encoder settings; lexical stub when no model path is configured.
    pub fn reranker_config(&self) -> CrossEncoderConfig {
        match &self.rerank_model_path {
            Some(path) => CrossEncoderConfig::new(path),
            None => CrossEncoderConfig::stub(),
        }
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            model: self.llm_model.clone(),
            api_base: self.llm_api_base.clone(),
            api_key: self.llm_api_key.clone(),
            temperature: self.temperature,
        }
    }

    /// Index settings for an encoder producing `embedding_dim`-dimensional vectors.
    pub fn index_config(&self, embedding_dim: usize) -> IndexConfig {
        IndexConfig::new(&self.collection_name, &self.persist_dir).with_embedding_dim(embedding_dim)
    }

    fn require_dir(name: &'static str, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                name,
                path: path.to_path_buf(),
            });
        }
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory {
                name,
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn parse_retrieval_mode_from_env() -> Result<RetrievalMode, ConfigError> {
        let alpha = Self::parse_from_env(Self::ENV_HYBRID_ALPHA, DEFAULT_HYBRID_ALPHA)?;

        match env::var(Self::ENV_RETRIEVAL_MODE) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "" | "dense" => Ok(RetrievalMode::Dense),
                "hybrid" => RetrievalMode::hybrid(alpha).map_err(|e| ConfigError::InvalidValue {
                    name: Self::ENV_HYBRID_ALPHA,
                    value: alpha.to_string(),
                    reason: e.to_string(),
                }),
                _ => Err(ConfigError::InvalidValue {
                    name: Self::ENV_RETRIEVAL_MODE,
                    value,
                    reason: "expected 'dense' or 'hybrid'".to_string(),
                }),
            },
            Err(_) => Ok(RetrievalMode::Dense),
        }
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    name: var_name,
                    value: value.clone(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }
}
