use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use tracing::{debug, info};

use super::error::GenerationError;
use super::prompt::ChatPrompt;
use crate::constants::DEFAULT_TEMPERATURE;

/// Default chat model name.
pub const DEFAULT_LLM_MODEL: &str = "qwen1.5-4b-chat";

#[async_trait]
/// Generation backend contract: one prompt in, raw model text out.
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone)]
/// Configuration for [`GenaiGenerator`].
pub struct GeneratorConfig {
    /// Model name passed to the provider.
    pub model: String,
    /// OpenAI-compatible base URL; `None` lets genai infer the provider from the model name.
    pub api_base: Option<String>,
    /// API key for `api_base`.
    pub api_key: Option<String>,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_LLM_MODEL.to_string(),
            api_base: None,
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.model.trim().is_empty() {
            return Err(GenerationError::InvalidConfig {
                reason: "model name must not be empty".to_string(),
            });
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(GenerationError::InvalidConfig {
                reason: format!("temperature must be within [0, 2], got {}", self.temperature),
            });
        }
        Ok(())
    }
}

/// [`Generator`] backed by `genai`.
pub struct GenaiGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl std::fmt::Debug for GenaiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiGenerator")
            .field("model", &self.config.model)
            .field("api_base", &self.config.api_base)
            .field("temperature", &self.config.temperature)
            .finish_non_exhaustive()
    }
}

impl GenaiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        config.validate()?;

        let client = match config.api_base.clone() {
            Some(base) => {
                info!(model = %config.model, api_base = %base, "Routing generation to OpenAI-compatible endpoint");
                let key = config.api_key.clone().unwrap_or_default();
                let resolver = ServiceTargetResolver::from_resolver_fn(
                    move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
                        let ServiceTarget { model, .. } = target;
                        Ok(ServiceTarget {
                            endpoint: Endpoint::from_owned(base.clone()),
                            auth: AuthData::from_single(key.clone()),
                            model: ModelIden::new(AdapterKind::OpenAI, model.model_name),
                        })
                    },
                );
                Client::builder()
                    .with_service_target_resolver(resolver)
                    .build()
            }
            None => Client::default(),
        };

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

#[async_trait]
impl Generator for GenaiGenerator {
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String, GenerationError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(prompt.system.as_str()),
            ChatMessage::user(prompt.user.as_str()),
        ]);
        let options = ChatOptions::default().with_temperature(self.config.temperature);

        debug!(
            model = %self.config.model,
            prompt_len = prompt.system.len() + prompt.user.len(),
            "Sending generation request"
        );

        let response = self
            .client
            .exec_chat(&self.config.model, request, Some(&options))
            .await
            .map_err(|e| GenerationError::RequestFailed {
                model: self.config.model.clone(),
                reason: e.to_string(),
            })?;

        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(GenerationError::EmptyResponse {
                model: self.config.model.clone(),
            }),
        }
    }
}
