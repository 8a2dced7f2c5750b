use std::time::Duration;

use crate::retrieval::Candidate;
use crate::scoring::RankedCandidate;

/// Message shown when no clause clears the relevance threshold.
pub const NO_RELEVANT_CLAUSES_MESSAGE: &str = "未找到相关法律条款";

/// How a query concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The generator answered from the cited clauses.
    Answered {
        answer: String,
        reasoning: Vec<String>,
    },
    /// No reranked clause cleared the threshold; the generator was not called.
    NoRelevantClauses,
}

/// Retrieval and rerank results for one question.
#[derive(Debug, Clone)]
pub struct RankedRetrieval {
    pub retrieved: Vec<Candidate>,
    pub reranked: Vec<RankedCandidate>,
}

/// Full result of [`QueryPipeline::answer`](super::QueryPipeline::answer).
#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub question: String,
    pub outcome: QueryOutcome,
    /// Clauses above the threshold, in rerank order; these are the citations.
    pub supporting: Vec<RankedCandidate>,
    /// Every reranked clause, including those filtered out.
    pub reranked: Vec<RankedCandidate>,
    pub elapsed: Duration,
}

impl QueryResponse {
    /// The cleaned answer, or `None` when no relevant clause was found.
    pub fn answer(&self) -> Option<&str> {
        match &self.outcome {
            QueryOutcome::Answered { answer, .. } => Some(answer),
            QueryOutcome::NoRelevantClauses => None,
        }
    }

    pub fn reasoning(&self) -> &[String] {
        match &self.outcome {
            QueryOutcome::Answered { reasoning, .. } => reasoning,
            QueryOutcome::NoRelevantClauses => &[],
        }
    }

    /// Text to show the user: the answer or the no-match message.
    pub fn display_answer(&self) -> &str {
        self.answer().unwrap_or(NO_RELEVANT_CLAUSES_MESSAGE)
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.outcome, QueryOutcome::Answered { .. })
    }
}
