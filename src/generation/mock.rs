use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::GenerationError;
use super::generator::Generator;
use super::prompt::ChatPrompt;

type ReplyFn = dyn Fn(&ChatPrompt) -> String + Send + Sync;

/// Scripted generation backend for tests.
#[derive(Clone)]
pub struct MockGenerator {
    reply: Arc<ReplyFn>,
    fail_when: Option<String>,
    prompts: Arc<Mutex<Vec<ChatPrompt>>>,
}

impl MockGenerator {
    /// Always answers `text`.
    pub fn constant(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_fn(move |_| text.clone())
    }

    /// Answers with `f(prompt)`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&ChatPrompt) -> String + Send + Sync + 'static,
    {
        Self {
            reply: Arc::new(f),
            fail_when: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fails every request whose user message contains `needle`.
    pub fn failing_when(mut self, needle: impl Into<String>) -> Self {
        self.fail_when = Some(needle.into());
        self
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Every prompt received, in call order.
    pub fn prompts(&self) -> Vec<ChatPrompt> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String, GenerationError> {
        self.prompts.lock().push(prompt.clone());
        if let Some(needle) = &self.fail_when {
            if prompt.user.contains(needle.as_str()) {
                return Err(GenerationError::RequestFailed {
                    model: "mock".to_string(),
                    reason: format!("scripted failure for '{needle}'"),
                });
            }
        }
        Ok((self.reply)(prompt))
    }
}
