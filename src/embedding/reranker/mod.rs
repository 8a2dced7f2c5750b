pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use config::{CrossEncoderConfig, MAX_SEQ_LEN};
pub use error::RerankerError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRelevanceScorer;

use std::collections::HashSet;

use candle_core::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::BertClassifier;
use crate::embedding::device::select_device;
use crate::embedding::utils::load_truncating_tokenizer;
use crate::text::tokenize;

/// Reranking backend contract: one relevance score per candidate, in input order.
pub trait RelevanceScorer: Send + Sync {
    fn score_batch(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>, RerankerError>;
}

/// Function words ignored by the stub scorer.
const STOP_TERMS: [&str; 24] = [
    "的", "了", "是", "在", "和", "与", "或", "吗", "呢", "么", "啊", "有", "我", "你", "他",
    "其", "之", "等", "the", "a", "an", "of", "is", "to",
];

/// Cross-encoder reranker (BERT sequence-pair classifier).
///
/// Logits are squashed with a sigmoid so scores are in `[0, 1]`.
pub struct CrossEncoder {
    device: candle_core::Device,
    config: CrossEncoderConfig,
    model: Option<(BertClassifier, Tokenizer)>,
}

impl std::fmt::Debug for CrossEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoder")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl CrossEncoder {
    pub fn load(config: CrossEncoderConfig) -> Result<Self, RerankerError> {
        if let Err(reason) = config.validate() {
            return Err(RerankerError::InvalidConfig { reason });
        }

        let device = select_device();
        debug!(?device, "Selected compute device for reranker");

        let Some(model_path) = config.model_path.clone() else {
            warn!("No reranker model path configured, scoring with lexical stub");
            return Ok(Self {
                device,
                config,
                model: None,
            });
        };

        info!(model_path = %model_path.display(), "Loading reranker model");

        let model = BertClassifier::load(&model_path, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                model_dir: model_path.clone(),
                reason: e.to_string(),
            }
        })?;

        let tokenizer = load_truncating_tokenizer(&model_path, config.max_seq_len).map_err(|e| {
            RerankerError::ModelLoadFailed {
                model_dir: model_path.clone(),
                reason: format!("tokenizer: {e}"),
            }
        })?;

        info!("Reranker model loaded successfully");

        Ok(Self {
            device,
            config,
            model: Some((model, tokenizer)),
        })
    }

    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(CrossEncoderConfig::stub())
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &CrossEncoderConfig {
        &self.config
    }

    /// Scores one query/candidate pair.
    pub fn score(&self, query: &str, candidate: &str) -> Result<f32, RerankerError> {
        match &self.model {
            Some((model, tokenizer)) => self.score_with_model(model, tokenizer, query, candidate),
            None => Ok(lexical_relevance(query, candidate)),
        }
    }

    fn score_with_model(
        &self,
        model: &BertClassifier,
        tokenizer: &Tokenizer,
        query: &str,
        candidate: &str,
    ) -> Result<f32, RerankerError> {
        let tokens = tokenizer.encode((query, candidate), true).map_err(|e| {
            RerankerError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let token_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(tokens.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = model
            .forward(&token_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| RerankerError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let logit = logits
            .flatten_all()?
            .to_vec1::<f32>()?
            .first()
            .copied()
            .ok_or_else(|| RerankerError::InferenceFailed {
                reason: "classifier produced no logits".to_string(),
            })?;

        Ok(sigmoid(logit))
    }
}

impl RelevanceScorer for CrossEncoder {
    fn score_batch(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>, RerankerError> {
        debug!(
            query_len = query.len(),
            num_candidates = candidates.len(),
            model_loaded = self.is_model_loaded(),
            "Scoring candidates"
        );

        candidates
            .iter()
            .map(|candidate| self.score(query, candidate))
            .collect()
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Model-free relevance in `[0, 1]`: query-term recall blended with Jaccard overlap.
pub fn lexical_relevance(query: &str, candidate: &str) -> f32 {
    let stop: HashSet<&str> = STOP_TERMS.into_iter().collect();

    let query_tokens = tokenize(query);
    let query_terms: HashSet<&str> = query_tokens
        .iter()
        .map(String::as_str)
        .filter(|t| !stop.contains(t))
        .collect();

    if query_terms.is_empty() {
        return 0.0;
    }

    let candidate_tokens = tokenize(candidate);
    let candidate_terms: HashSet<&str> = candidate_tokens
        .iter()
        .map(String::as_str)
        .filter(|t| !stop.contains(t))
        .collect();

    let matches = query_terms.intersection(&candidate_terms).count();
    let recall = matches as f32 / query_terms.len() as f32;

    let union = query_terms.union(&candidate_terms).count();
    let jaccard = if union > 0 {
        matches as f32 / union as f32
    } else {
        0.0
    };

    let base_score = 0.6 * recall + 0.4 * jaccard;

    sigmoid(8.0 * (base_score - 0.5)).clamp(0.0, 1.0)
}
