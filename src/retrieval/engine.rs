use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::lexical::Bm25Index;
use super::types::{Candidate, sort_candidates};
use crate::constants::CANDIDATE_OVERFETCH;
use crate::error::{PipelineError, PipelineResult};
use crate::index::IndexManager;
use crate::vectordb::VectorStore;

/// First-stage retrieval strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetrievalMode {
    /// Pure embedding similarity.
    Dense,
    /// `alpha * dense + (1 - alpha) * normalized BM25`; `alpha = 1` is pure dense.
    Hybrid { alpha: f32 },
}

impl RetrievalMode {
    /// Hybrid mode with a validated mixing weight.
    pub fn hybrid(alpha: f32) -> PipelineResult<Self> {
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return Err(PipelineError::InvalidParameter {
                name: "hybrid_alpha",
                reason: format!("must be within [0, 1], got {alpha}"),
            });
        }
        Ok(RetrievalMode::Hybrid { alpha })
    }

    /// Weight given to the dense score.
    pub fn alpha(&self) -> f32 {
        match self {
            RetrievalMode::Dense => 1.0,
            RetrievalMode::Hybrid { alpha } => *alpha,
        }
    }
}

impl std::fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalMode::Dense => write!(f, "dense"),
            RetrievalMode::Hybrid { alpha } => write!(f, "hybrid(alpha={alpha})"),
        }
    }
}

/// Top-K clause retrieval over an [`IndexManager`].
pub struct Retriever<V: VectorStore> {
    index: Arc<IndexManager<V>>,
    top_k: usize,
    mode: RetrievalMode,
}

impl<V: VectorStore> std::fmt::Debug for Retriever<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("top_k", &self.top_k)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<V: VectorStore> Retriever<V> {
    pub fn new(index: Arc<IndexManager<V>>, top_k: usize, mode: RetrievalMode) -> PipelineResult<Self> {
        if top_k == 0 {
            return Err(PipelineError::InvalidParameter {
                name: "top_k",
                reason: "must be greater than 0".to_string(),
            });
        }
        if let RetrievalMode::Hybrid { alpha } = mode {
            RetrievalMode::hybrid(alpha)?;
        }

        Ok(Self { index, top_k, mode })
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn mode(&self) -> RetrievalMode {
        self.mode
    }

    pub fn index(&self) -> &Arc<IndexManager<V>> {
        &self.index
    }

    /// Returns at most `top_k` candidates, best first, ties in ingestion order.
    #[instrument(skip(self, question), fields(top_k = self.top_k, mode = %self.mode))]
    pub async fn retrieve(&self, question: &str) -> PipelineResult<Vec<Candidate>> {
        let pool_size = self.top_k.saturating_mul(CANDIDATE_OVERFETCH);
        let mut pool = self.index.retrieve(question, pool_size).await?;

        if let RetrievalMode::Hybrid { alpha } = self.mode {
            match self.index.lexical().await {
                Some(lexical) => pool = blend_hybrid(pool, &lexical, question, alpha),
                None => warn!("No lexical index available, using dense scores only"),
            }
        }

        sort_candidates(&mut pool);
        pool.truncate(self.top_k);

        debug!(
            candidates = pool.len(),
            top_score = pool.first().map(|c| c.retrieval_score()),
            "Retrieval complete"
        );

        Ok(pool)
    }
}

/// Re-scores a dense candidate pool with pool-normalized BM25.
///
/// The blend lands in [`Candidate::retrieval_score`]; the dense similarity is kept.
pub fn blend_hybrid(
    pool: Vec<Candidate>,
    lexical: &Bm25Index,
    question: &str,
    alpha: f32,
) -> Vec<Candidate> {
    let terms = Bm25Index::query_terms(question);
    let sparse: Vec<f32> = pool
        .iter()
        .map(|c| lexical.score(&terms, c.clause().id()))
        .collect();
    let max_sparse = sparse.iter().copied().fold(0.0f32, f32::max);

    pool.into_iter()
        .zip(sparse)
        .map(|(candidate, raw)| {
            let normalized = if max_sparse > 0.0 { raw / max_sparse } else { 0.0 };
            let blended = alpha * candidate.similarity() + (1.0 - alpha) * normalized;
            candidate.with_retrieval_score(blended)
        })
        .collect()
}
