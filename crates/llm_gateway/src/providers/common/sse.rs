//! Decoding of streamed chat completion bodies.

use eventsource_stream::Eventsource;
use futures_util::{future, StreamExt};
use reqwest::Response;

use super::openai_compat::parse_openai_compat_sse_data_strict;
use crate::provider::{LLMError, LLMStream, Result};
use crate::types::LLMChunk;

/// Map one `data:` payload. Keep-alives and empty deltas yield nothing.
fn decode_completion_data(data: &str) -> Result<Option<LLMChunk>> {
    if data.trim().is_empty() {
        return Ok(None);
    }

    match parse_openai_compat_sse_data_strict(data) {
        Ok(LLMChunk::Token(token)) if token.is_empty() => Ok(None),
        Ok(chunk) => Ok(Some(chunk)),
        Err(e) => Err(LLMError::Stream(format!("Invalid completion chunk: {}", e))),
    }
}

/// Stream the tokens of a completion response.
///
/// Ends after `LLMChunk::Done` or the first error; anything the upstream
/// sends afterwards is ignored.
pub fn completion_stream(response: Response) -> LLMStream {
    let stream = response
        .bytes_stream()
        .eventsource()
        .map(|event| match event {
            Ok(event) => decode_completion_data(&event.data),
            Err(e) => Err(LLMError::Stream(e.to_string())),
        })
        .filter_map(|result| async move { result.transpose() })
        .scan(false, |finished, item| {
            if *finished {
                return future::ready(None);
            }
            *finished = matches!(item, Ok(LLMChunk::Done) | Err(_));
            future::ready(Some(item))
        });

    Box::pin(stream)
}
