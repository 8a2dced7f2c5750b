use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use super::backends::Backends;
use super::response::{QueryOutcome, QueryResponse, RankedRetrieval};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::generation::ResponseSynthesizer;
use crate::index::IndexManager;
use crate::retrieval::Retriever;
use crate::scoring::{RelevanceFilter, Reranker};
use crate::vectordb::VectorStore;

/// Retrieve, rerank, filter and synthesize, in that order, for one question at a time.
pub struct QueryPipeline<V: VectorStore> {
    retriever: Retriever<V>,
    reranker: Reranker,
    filter: RelevanceFilter,
    synthesizer: ResponseSynthesizer,
}

impl<V: VectorStore> std::fmt::Debug for QueryPipeline<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPipeline")
            .field("retriever", &self.retriever)
            .field("reranker", &self.reranker)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl<V: VectorStore> QueryPipeline<V> {
    /// Fails if the reranker could keep more candidates than retrieval returns.
    pub fn new(
        retriever: Retriever<V>,
        reranker: Reranker,
        filter: RelevanceFilter,
        synthesizer: ResponseSynthesizer,
    ) -> PipelineResult<Self> {
        if reranker.top_n() > retriever.top_k() {
            return Err(PipelineError::InvalidParameter {
                name: "rerank_top_n",
                reason: format!(
                    "{} exceeds retrieval top_k {}",
                    reranker.top_n(),
                    retriever.top_k()
                ),
            });
        }

        Ok(Self {
            retriever,
            reranker,
            filter,
            synthesizer,
        })
    }

    /// Wires every stage from `config` around an initialized index.
    pub fn from_config(
        config: &Config,
        index: Arc<IndexManager<V>>,
        backends: &Backends,
    ) -> PipelineResult<Self> {
        config.validate()?;

        Self::new(
            Retriever::new(index, config.top_k, config.retrieval_mode)?,
            Reranker::new(backends.scorer.clone(), config.rerank_top_n)?,
            RelevanceFilter::new(config.min_rerank_score),
            ResponseSynthesizer::new(backends.generator.clone()),
        )
    }

    pub fn retriever(&self) -> &Retriever<V> {
        &self.retriever
    }

    pub fn reranker(&self) -> &Reranker {
        &self.reranker
    }

    pub fn filter(&self) -> &RelevanceFilter {
        &self.filter
    }

    /// Runs retrieval and reranking only.
    pub async fn retrieve_ranked(&self, question: &str) -> PipelineResult<RankedRetrieval> {
        let retrieved = self.retriever.retrieve(question).await?;
        let reranked = self.reranker.rerank(question, retrieved.clone())?;
        Ok(RankedRetrieval {
            retrieved,
            reranked,
        })
    }

    /// Answers `question` from the clauses that clear the relevance threshold.
    ///
    /// An empty filtered set is a normal outcome ([`QueryOutcome::NoRelevantClauses`]) and
    /// skips generation entirely.
    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn answer(&self, question: &str) -> PipelineResult<QueryResponse> {
        let start = Instant::now();

        let RankedRetrieval {
            retrieved,
            reranked,
        } = self.retrieve_ranked(question).await?;
        let supporting = self.filter.apply(&reranked);

        debug!(
            retrieved = retrieved.len(),
            reranked = reranked.len(),
            supporting = supporting.len(),
            min_score = self.filter.min_score(),
            "Candidates filtered"
        );

        let outcome = if supporting.is_empty() {
            info!("No clause above the relevance threshold");
            QueryOutcome::NoRelevantClauses
        } else {
            let synthesized = self.synthesizer.synthesize(question, &supporting).await?;
            QueryOutcome::Answered {
                answer: synthesized.answer,
                reasoning: synthesized.reasoning,
            }
        };

        let elapsed = start.elapsed();
        info!(
            supporting = supporting.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Query answered"
        );

        Ok(QueryResponse {
            question: question.to_string(),
            outcome,
            supporting,
            reranked,
            elapsed,
        })
    }
}
