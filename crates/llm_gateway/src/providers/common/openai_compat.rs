//! OpenAI chat-completions request and stream shapes.
//!
//! Messages are flattened to `{ role, content }` with the concatenated text
//! parts. Ids and timestamps stay local.

use chat_core::Message;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::provider::Result;
use crate::types::LLMChunk;

pub fn messages_to_openai_compat_json(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| {
            json!({
                "role": m.role.as_str(),
                "content": m.text(),
            })
        })
        .collect()
}

/// Build a streaming chat request body.
pub fn build_openai_compat_body(
    model: &str,
    messages: &[Message],
    reasoning_effort: Option<&str>,
) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages_to_openai_compat_json(messages),
        "stream": true,
    });

    if let Some(effort) = reasoning_effort {
        body["reasoning_effort"] = json!(effort);
    }

    body
}

#[derive(Debug, Deserialize)]
pub struct OpenAICompatStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAICompatChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAICompatChoice {
    #[serde(default)]
    delta: OpenAICompatDelta,
}

#[derive(Debug, Deserialize, Default)]
struct OpenAICompatDelta {
    content: Option<String>,
}

/// Error envelope of a rejected request.
#[derive(Debug, Deserialize)]
struct OpenAICompatErrorBody {
    error: OpenAICompatError,
}

#[derive(Debug, Deserialize)]
struct OpenAICompatError {
    message: String,
}

pub fn parse_openai_compat_chunk(chunk: OpenAICompatStreamChunk) -> LLMChunk {
    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .unwrap_or_default();
    LLMChunk::Token(content)
}

/// Parse one SSE `data:` payload.
///
/// - `"[DONE]"` -> `LLMChunk::Done`
/// - Invalid JSON -> error
pub fn parse_openai_compat_sse_data_strict(data: &str) -> Result<LLMChunk> {
    if data.trim() == "[DONE]" {
        return Ok(LLMChunk::Done);
    }

    let chunk: OpenAICompatStreamChunk = serde_json::from_str(data)?;
    Ok(parse_openai_compat_chunk(chunk))
}

/// The `error.message` of an error response body, if it has one.
pub fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<OpenAICompatErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
}
