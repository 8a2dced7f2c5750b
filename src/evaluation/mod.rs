//! Benchmark evaluation.
//!
//! [`RecallEvaluator`] scores retrieval plus reranking against labelled clauses.
//! [`EndToEndEvaluator`] runs the full pipeline and scores the clauses each answer cites.
//! Benchmark labels match a clause by identifier or by full title.

pub mod benchmark;
pub mod end_to_end;
pub mod error;
pub mod recall;
pub mod report;


pub use benchmark::{
    EndToEndCase, RetrievalCase, StandardAnswer, label_recall, load_end_to_end_cases,
    load_retrieval_cases,
};
pub use end_to_end::{EndToEndEvaluator, score_response};
pub use error::{EvaluationError, EvaluationResult};
pub use recall::RecallEvaluator;
pub use report::{
    CaseFailure, EndToEndCaseResult, EndToEndReport, EvaluationSummary, RecallCase, RecallReport,
};
