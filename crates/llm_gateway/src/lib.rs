//! llm_gateway - Upstream language model access
//!
//! Providers turn a chat message log into a stream of [`LLMChunk`]s.

pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{LLMError, LLMProvider, LLMStream, Result};
pub use providers::OpenAIProvider;
pub use types::LLMChunk;
