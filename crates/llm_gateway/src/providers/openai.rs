use async_trait::async_trait;
use chat_core::config::{DEFAULT_API_BASE, DEFAULT_MODEL};
use chat_core::{Config, Message};
use reqwest::Client;

use crate::provider::{LLMError, LLMProvider, LLMStream, Result};

use super::common::openai_compat::{build_openai_compat_body, extract_error_message};
use super::common::sse::completion_stream;

/// Streams replies from an OpenAI compatible `/chat/completions` endpoint.
///
/// No retry layer: a failed request is reported once.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    reasoning_effort: Option<String>,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            reasoning_effort: None,
        }
    }

    /// Build from configuration. `None` when no credential is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.credential()?;
        Some(
            Self::new(api_key)
                .with_base_url(config.api_base.clone())
                .with_model(config.model.clone())
                .with_reasoning_effort(config.reasoning_effort.clone()),
        )
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_reasoning_effort(mut self, effort: Option<String>) -> Self {
        self.reasoning_effort = effort;
        self
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat_stream(&self, messages: &[Message], model: Option<&str>) -> Result<LLMStream> {
        let model = model.unwrap_or(&self.model);
        let body = build_openai_compat_body(model, messages, self.reasoning_effort.as_deref());

        tracing::debug!(model, message_count = messages.len(), "Requesting completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            let message =
                extract_error_message(&text).unwrap_or_else(|| format!("HTTP {}: {}", status, text));
            tracing::warn!(%status, error = %message, "Completion request rejected");
            return Err(LLMError::Api(message));
        }

        Ok(completion_stream(response))
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}
