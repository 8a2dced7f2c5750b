use std::sync::Arc;

use futures_util::{StreamExt, stream};
use tracing::{debug, info, instrument, warn};

use super::benchmark::{RetrievalCase, label_recall};
use super::report::{CaseFailure, RecallCase, RecallReport};
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::QueryPipeline;
use crate::vectordb::VectorStore;

/// Measures how many labelled clauses survive retrieval and reranking.
pub struct RecallEvaluator<V: VectorStore> {
    pipeline: Arc<QueryPipeline<V>>,
    concurrency: usize,
}

impl<V: VectorStore> RecallEvaluator<V> {
    /// `concurrency` bounds how many cases are in flight at once.
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

    /// Evaluates one case. Recall is computed over the reranked clauses.
    pub async fn evaluate_case(&self, case: &RetrievalCase) -> PipelineResult<RecallCase> {
        let ranked = self.pipeline.retrieve_ranked(&case.question).await?;
        let reranked: Vec<_> = ranked.reranked.iter().map(|r| r.clause()).collect();
        let recall = label_recall(&case.relevant_ids, &reranked);

        debug!(question = %case.question, recall, "Retrieval case evaluated");

        Ok(RecallCase {
            question: case.question.clone(),
            initial_titles: ranked
                .retrieved
                .iter()
                .map(|c| c.clause().full_title().to_string())
                .collect(),
            reranked_titles: reranked.iter().map(|c| c.full_title().to_string()).collect(),
            targets: case.relevant_ids.clone(),
            recall,
        })
    }

    /// Runs every case, keeping input order. Failing cases are recorded, not propagated.
    #[instrument(skip_all, fields(cases = cases.len(), concurrency = self.concurrency))]
    pub async fn evaluate(&self, cases: &[RetrievalCase]) -> RecallReport {
        let outcomes: Vec<_> = stream::iter(cases)
            .map(|case| self.evaluate_case(case))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut report = RecallReport::default();
        for (i, (case, outcome)) in cases.iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(result) => report.cases.push(result),
                Err(e) => {
                    warn!(case = i + 1, question = %case.question, error = %e, "Retrieval case failed");
                    report.failures.push(CaseFailure {
                        index: i + 1,
                        question: case.question.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            evaluated = report.cases.len(),
            failed = report.failures.len(),
            mean_recall = report.mean_recall(),
            "Recall evaluation complete"
        );
        report
    }
}
