use crate::types::LLMChunk;
use async_trait::async_trait;
use chat_core::Message;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    /// The upstream rejected the request; carries its error message.
    #[error("{0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, LLMError>;

pub type LLMStream = Pin<Box<dyn Stream<Item = Result<LLMChunk>> + Send>>;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Stream a chat completion for the whole message log.
    ///
    /// # Arguments
    /// * `messages` - Chat messages, oldest first
    /// * `model` - Optional model override. If None, uses the provider's default model
    async fn chat_stream(&self, messages: &[Message], model: Option<&str>) -> Result<LLMStream>;

    /// Model used when no override is given
    fn default_model(&self) -> &str;
}
