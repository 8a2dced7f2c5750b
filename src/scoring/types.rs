use std::sync::Arc;

use crate::corpus::ClauseRecord;
use crate::retrieval::Candidate;

#[derive(Debug, Clone, PartialEq)]
/// Candidate annotated with a cross-encoder relevance score.
///
/// The retrieval similarity stays readable alongside the rerank score.
pub struct RankedCandidate {
    candidate: Candidate,
    rerank_score: f32,
}

impl RankedCandidate {
    pub fn new(candidate: Candidate, rerank_score: f32) -> Self {
        Self {
            candidate,
            rerank_score,
        }
    }

    pub fn clause(&self) -> &ClauseRecord {
        self.candidate.clause()
    }

    pub fn clause_arc(&self) -> &Arc<ClauseRecord> {
        self.candidate.clause_arc()
    }

    /// First-stage dense similarity score.
    pub fn similarity(&self) -> f32 {
        self.candidate.similarity()
    }

    /// Score the candidate was retrieved with (blended in hybrid mode).
    pub fn retrieval_score(&self) -> f32 {
        self.candidate.retrieval_score()
    }

    /// Cross-encoder relevance score.
    pub fn rerank_score(&self) -> f32 {
        self.rerank_score
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    /// Returns `true` if the rerank score strictly exceeds `threshold`.
    pub fn exceeds_threshold(&self, threshold: f32) -> bool {
        self.rerank_score > threshold
    }
}
