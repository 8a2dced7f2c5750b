use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{EvaluationError, EvaluationResult};
use crate::corpus::ClauseRecord;

/// A question with the clauses a retriever should surface for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalCase {
    pub question: String,
    /// Clause identifiers or full titles.
    #[serde(default)]
    pub relevant_ids: Vec<String>,
}

/// Reference answer for an end-to-end case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardAnswer {
    /// Clauses the answer must cite.
    #[serde(rename = "条款", alias = "required_clauses", alias = "clauses", default)]
    pub clauses: Vec<String>,
    /// Any other reference fields (expected conclusion, amounts, ...). Kept, never scored.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A question run through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndToEndCase {
    pub question: String,
    #[serde(default)]
    pub standard_answer: StandardAnswer,
}

impl EndToEndCase {
    pub fn required_clauses(&self) -> &[String] {
        &self.standard_answer.clauses
    }
}

pub fn load_retrieval_cases(path: &Path) -> EvaluationResult<Vec<RetrievalCase>> {
    load_cases(path)
}

pub fn load_end_to_end_cases(path: &Path) -> EvaluationResult<Vec<EndToEndCase>> {
    load_cases(path)
}

fn load_cases<T: DeserializeOwned>(path: &Path) -> EvaluationResult<Vec<T>> {
    let raw = std::fs::read_to_string(path).map_err(|source| EvaluationError::BenchmarkIo {
        path: path.to_path_buf(),
        source,
    })?;
    let cases: Vec<T> =
        serde_json::from_str(&raw).map_err(|source| EvaluationError::BenchmarkFormat {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), cases = cases.len(), "Benchmark loaded");
    Ok(cases)
}

/// Distinct labels in first-seen order.
pub(crate) fn distinct_labels(labels: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .map(String::as_str)
        .filter(|label| seen.insert(*label))
        .collect()
}

/// Splits `labels` into those matched by some clause in `clauses` and those that are not.
pub(crate) fn partition_labels<'a>(
    labels: &'a [String],
    clauses: &[&ClauseRecord],
) -> (Vec<&'a str>, Vec<&'a str>) {
    distinct_labels(labels)
        .into_iter()
        .partition(|label| clauses.iter().any(|clause| clause.matches_label(label)))
}

/// Fraction of distinct `labels` matched by `clauses`; 0.0 when there are no labels.
pub fn label_recall(labels: &[String], clauses: &[&ClauseRecord]) -> f64 {
    let (hits, misses) = partition_labels(labels, clauses);
    let total = hits.len() + misses.len();
    if total == 0 {
        return 0.0;
    }
    hits.len() as f64 / total as f64
}
