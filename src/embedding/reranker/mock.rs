use std::sync::Arc;

use super::{RelevanceScorer, RerankerError};

type ScoreFn = dyn Fn(&str, &str) -> f32 + Send + Sync;

/// Scripted reranking backend for tests.
#[derive(Clone)]
pub struct MockRelevanceScorer {
    score_fn: Arc<ScoreFn>,
    fail: bool,
}

impl MockRelevanceScorer {
    /// Every candidate gets `score`.
    pub fn constant(score: f32) -> Self {
        Self::from_fn(move |_, _| score)
    }

    /// Scores each `(query, candidate)` pair with `f`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> f32 + Send + Sync + 'static,
    {
        Self {
            score_fn: Arc::new(f),
            fail: false,
        }
    }

    /// Every call fails with an inference error.
    pub fn failing() -> Self {
        Self {
            score_fn: Arc::new(|_: &str, _: &str| 0.0f32),
            fail: true,
        }
    }
}

impl RelevanceScorer for MockRelevanceScorer {
    fn score_batch(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>, RerankerError> {
        if self.fail {
            return Err(RerankerError::InferenceFailed {
                reason: "mock reranker failure".to_string(),
            });
        }
        Ok(candidates
            .iter()
            .map(|candidate| (self.score_fn)(query, candidate))
            .collect())
    }
}
