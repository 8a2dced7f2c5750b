use std::cmp::Ordering;
use std::sync::Arc;

use crate::corpus::ClauseRecord;

/// A retrieved clause with its first-stage scores.
///
/// `similarity` is always the dense cosine score. `retrieval_score` orders candidates: it equals
/// the similarity in dense mode and holds the blended score in hybrid mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    clause: Arc<ClauseRecord>,
    similarity: f32,
    retrieval_score: f32,
}

impl Candidate {
    pub fn new(clause: Arc<ClauseRecord>, similarity: f32) -> Self {
        Self {
            clause,
            similarity,
            retrieval_score: similarity,
        }
    }

    pub fn clause(&self) -> &ClauseRecord {
        &self.clause
    }

    /// Shared handle to the clause, for stages that keep it past the candidate.
    pub fn clause_arc(&self) -> &Arc<ClauseRecord> {
        &self.clause
    }

    /// Dense similarity between question and clause embeddings.
    pub fn similarity(&self) -> f32 {
        self.similarity
    }

    /// Score retrieval ranked by.
    pub fn retrieval_score(&self) -> f32 {
        self.retrieval_score
    }

    pub(crate) fn with_retrieval_score(self, retrieval_score: f32) -> Self {
        Self {
            retrieval_score,
            ..self
        }
    }
}

/// Descending score, ties broken by ingestion ordinal (first-seen wins).
///
/// NaN scores sort last.
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        descending(a.retrieval_score, b.retrieval_score)
            .then_with(|| a.clause.ordinal().cmp(&b.clause.ordinal()))
    });
}

pub(crate) fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
