use std::sync::Arc;

use tracing::debug;

use super::types::RankedCandidate;
use crate::embedding::{RelevanceScorer, RerankerError};
use crate::error::{PipelineError, PipelineResult};
use crate::retrieval::Candidate;
use crate::retrieval::types::descending;

/// Second-stage reranking: scores every candidate and keeps the best `top_n`.
#[derive(Clone)]
pub struct Reranker {
    scorer: Arc<dyn RelevanceScorer>,
    top_n: usize,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("top_n", &self.top_n)
            .finish_non_exhaustive()
    }
}

impl Reranker {
    pub fn new(scorer: Arc<dyn RelevanceScorer>, top_n: usize) -> PipelineResult<Self> {
        if top_n == 0 {
            return Err(PipelineError::InvalidParameter {
                name: "rerank_top_n",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(Self { scorer, top_n })
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Scores `candidates` against `question` and returns the top `top_n`.
    ///
    /// The sort is stable, so equal scores keep retrieval order. An empty input yields an
    /// empty output without calling the backend.
    pub fn rerank(
        &self,
        question: &str,
        candidates: Vec<Candidate>,
    ) -> Result<Vec<RankedCandidate>, RerankerError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = candidates.iter().map(|c| c.clause().text()).collect();
        let scores = self.scorer.score_batch(question, &texts)?;
        if scores.len() != candidates.len() {
            return Err(RerankerError::ScoreCountMismatch {
                expected: candidates.len(),
                actual: scores.len(),
            });
        }

        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .zip(scores)
            .map(|(candidate, score)| RankedCandidate::new(candidate, score))
            .collect();

        ranked.sort_by(|a, b| descending(a.rerank_score(), b.rerank_score()));
        ranked.truncate(self.top_n);

        debug!(
            kept = ranked.len(),
            top_n = self.top_n,
            top_score = ranked.first().map(|r| r.rerank_score()),
            "Rerank complete"
        );

        Ok(ranked)
    }
}
