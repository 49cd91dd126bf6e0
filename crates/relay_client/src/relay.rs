use async_trait::async_trait;
use chat_core::{Message, UiStreamChunk, UI_STREAM_DONE};
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::GatewayError;
use crate::gateway::{CompletionGateway, ReplyEvent, ReplyStream};

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the relay's `POST /api/chat`.
#[derive(Clone)]
pub struct RelayClient {
    client: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

/// Map one `data:` payload of the UI message stream.
///
/// Chunks the assistant does not render are skipped.
pub fn decode_ui_stream_data(data: &str) -> Result<Option<ReplyEvent>, GatewayError> {
    let data = data.trim();
    if data.is_empty() || data == UI_STREAM_DONE {
        return Ok(None);
    }

    let chunk: UiStreamChunk = serde_json::from_str(data)
        .map_err(|e| GatewayError::Stream(format!("Invalid stream chunk: {}", e)))?;

    Ok(match chunk {
        UiStreamChunk::Start {
            message_id: Some(message_id),
        } => Some(ReplyEvent::Started { message_id }),
        UiStreamChunk::TextDelta { delta, .. } => Some(ReplyEvent::Delta(delta)),
        UiStreamChunk::Finish => Some(ReplyEvent::Finished),
        UiStreamChunk::Error { error_text } => return Err(GatewayError::Stream(error_text)),
        _ => None,
    })
}

#[async_trait]
impl CompletionGateway for RelayClient {
    async fn stream_reply(
        &self,
        messages: &[Message],
        cancel: CancellationToken,
    ) -> Result<ReplyStream, GatewayError> {
        tracing::debug!(
            endpoint = %self.endpoint(),
            message_count = messages.len(),
            "Posting chat request"
        );

        let request = self
            .client
            .post(self.endpoint())
            .json(&ChatRequest { messages })
            .send();

        let response = tokio::select! {
            response = request => response?,
            _ = cancel.cancelled() => {
                tracing::debug!("Chat request cancelled before the relay answered");
                return Ok(Box::pin(futures::stream::empty::<Result<ReplyEvent, GatewayError>>()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            tracing::warn!(status = status.as_u16(), error = %message, "Relay rejected request");
            return Err(GatewayError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        let stream = response
            .bytes_stream()
            .eventsource()
            .map(|event| match event {
                Ok(event) => decode_ui_stream_data(&event.data),
                Err(e) => Err(GatewayError::Stream(e.to_string())),
            })
            .filter_map(|result| async move { result.transpose() })
            .take_until(async move { cancel.cancelled().await });

        Ok(Box::pin(stream))
    }
}
