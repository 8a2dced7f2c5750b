use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::embedding::{BertEncoder, CrossEncoder, RelevanceScorer, TextEmbedder};
use crate::error::PipelineResult;
use crate::generation::{GenaiGenerator, Generator};

/// Model backends shared by every pipeline stage.
///
/// Built once at startup and passed to the components that need them.
#[derive(Clone)]
pub struct Backends {
    pub embedder: Arc<dyn TextEmbedder>,
    pub scorer: Arc<dyn RelevanceScorer>,
    pub generator: Arc<dyn Generator>,
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("embedding_dim", &self.embedder.embedding_dim())
            .finish_non_exhaustive()
    }
}

impl Backends {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        scorer: Arc<dyn RelevanceScorer>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            embedder,
            scorer,
            generator,
        }
    }

    /// Loads the encoder, cross-encoder and generator described by `config`.
    pub fn from_config(config: &Config) -> PipelineResult<Self> {
        let encoder = BertEncoder::load(config.encoder_config())?;
        if encoder.is_stub() {
            warn!("Sentence encoder running in stub mode (no model path configured)");
        }

        let cross_encoder = CrossEncoder::load(config.reranker_config())?;
        let generator = GenaiGenerator::new(config.generator_config())?;

        info!(
            embedding_dim = encoder.embedding_dim(),
            reranker_loaded = cross_encoder.is_model_loaded(),
            llm_model = %config.llm_model,
            "Backends ready"
        );

        Ok(Self::new(
            Arc::new(encoder),
            Arc::new(cross_encoder),
            Arc::new(generator),
        ))
    }

    /// Stub encoder and lexical reranker around the given generator.
    pub fn stub(generator: Arc<dyn Generator>) -> PipelineResult<Self> {
        Ok(Self::new(
            Arc::new(BertEncoder::stub()?),
            Arc::new(CrossEncoder::stub()?),
            generator,
        ))
    }
}
