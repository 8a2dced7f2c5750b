use std::sync::Arc;

use futures_util::{StreamExt, stream};
use tracing::{debug, info, instrument, warn};

use super::benchmark::{EndToEndCase, partition_labels};
use super::report::{CaseFailure, EndToEndCaseResult, EndToEndReport};
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::{QueryPipeline, QueryResponse};
use crate::vectordb::VectorStore;

/// Runs questions through the full pipeline and scores the cited clauses.
pub struct EndToEndEvaluator<V: VectorStore> {
    pipeline: Arc<QueryPipeline<V>>,
    concurrency: usize,
}

impl<V: VectorStore> EndToEndEvaluator<V> {
    pub fn new(pipeline: Arc<QueryPipeline<V>>, concurrency: usize) -> PipelineResult<Self> {
        if concurrency == 0 {
            return Err(PipelineError::InvalidParameter {
                name: "eval_concurrency",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(Self {
            pipeline,
            concurrency,
        })
    }

    pub async fn evaluate_case(&self, case: &EndToEndCase) -> PipelineResult<EndToEndCaseResult> {
        let response = self.pipeline.answer(&case.question).await?;
        let result = score_response(case, &response);

        debug!(
            question = %case.question,
            clause_score = result.clause_score,
            hits = result.hit_clauses.len(),
            missed = result.missed_clauses.len(),
            "End-to-end case evaluated"
        );
        Ok(result)
    }

    /// Runs every case, keeping input order.
    ///
    /// A failing case becomes a [`CaseFailure`] and never aborts the batch.
    #[instrument(skip_all, fields(cases = cases.len(), concurrency = self.concurrency))]
    pub async fn evaluate(&self, cases: &[EndToEndCase]) -> EndToEndReport {
        let outcomes: Vec<_> = stream::iter(cases)
            .map(|case| self.evaluate_case(case))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut report = EndToEndReport::default();
        for (i, (case, outcome)) in cases.iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(result) => report.cases.push(result),
                Err(e) => {
                    warn!(case = i + 1, question = %case.question, error = %e, "End-to-end case failed");
                    report.failures.push(CaseFailure {
                        index: i + 1,
                        question: case.question.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            succeeded = report.success_count(),
            total = report.total(),
            mean_hit_rate = report.mean_hit_rate(),
            "End-to-end evaluation complete"
        );
        report
    }
}

/// Hit and missed clause sets against the clauses the response cited.
pub fn score_response(case: &EndToEndCase, response: &QueryResponse) -> EndToEndCaseResult {
    let cited: Vec<_> = response.supporting.iter().map(|r| r.clause()).collect();
    let (hits, missed) = partition_labels(case.required_clauses(), &cited);
    let required = hits.len() + missed.len();
    let clause_score = if required == 0 {
        0.0
    } else {
        hits.len() as f64 / required as f64
    };

    EndToEndCaseResult {
        question: case.question.clone(),
        hit_clauses: hits.into_iter().map(str::to_string).collect(),
        missed_clauses: missed.into_iter().map(str::to_string).collect(),
        clause_score,
        answered: response.is_answered(),
    }
}
