use std::sync::Arc;

use tracing::{debug, instrument};

use super::error::GenerationError;
use super::generator::Generator;
use super::prompt::ChatPrompt;
use super::reasoning::split_reasoning;
use crate::scoring::RankedCandidate;

/// Cleaned model answer plus the reasoning traces stripped from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAnswer {
    pub answer: String,
    pub reasoning: Vec<String>,
}

/// Builds the grounded prompt, calls the generator once and splits off reasoning traces.
#[derive(Clone)]
pub struct ResponseSynthesizer {
    generator: Arc<dyn Generator>,
}

impl std::fmt::Debug for ResponseSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSynthesizer").finish_non_exhaustive()
    }
}

impl ResponseSynthesizer {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    /// Callers must short-circuit on an empty clause set; this returns
    /// [`GenerationError::EmptyContext`] rather than prompting without context.
    #[instrument(skip(self, question, clauses), fields(clauses = clauses.len()))]
    pub async fn synthesize(
        &self,
        question: &str,
        clauses: &[RankedCandidate],
    ) -> Result<SynthesizedAnswer, GenerationError> {
        if clauses.is_empty() {
            return Err(GenerationError::EmptyContext);
        }

        let prompt = ChatPrompt::build(question, clauses);
        let raw = self.generator.generate(&prompt).await?;
        let split = split_reasoning(&raw);

        debug!(
            raw_len = raw.len(),
            answer_len = split.answer.len(),
            traces = split.reasoning.len(),
            "Generation complete"
        );

        Ok(SynthesizedAnswer {
            answer: split.answer,
            reasoning: split.reasoning,
        })
    }
}
