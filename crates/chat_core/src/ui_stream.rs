//! UI message stream protocol
//!
//! The relay answers with server-sent events whose `data:` payloads are
//! JSON chunks tagged by `type`, terminated by a literal `[DONE]` marker.
//! Clients recognise the protocol by the [`UI_STREAM_HEADER`] response header.

use serde::{Deserialize, Serialize};

/// Response header announcing the protocol version.
pub const UI_STREAM_HEADER: (&str, &str) = ("x-vercel-ai-ui-message-stream", "v1");

/// Final `data:` payload of every stream.
pub const UI_STREAM_DONE: &str = "[DONE]";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiStreamChunk {
    Start {
        #[serde(rename = "messageId", default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },
    StartStep,
    TextStart {
        id: String,
    },
    TextDelta {
        id: String,
        delta: String,
    },
    TextEnd {
        id: String,
    },
    FinishStep,
    Finish,
    Error {
        #[serde(rename = "errorText")]
        error_text: String,
    },
    /// Chunk types the assistant does not consume (reasoning, tools, metadata)
    #[serde(other)]
    Other,
}

impl UiStreamChunk {
    /// Encode as one SSE frame.
    pub fn to_sse_frame(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        format!("data: {}\n\n", json)
    }

    pub fn done_frame() -> String {
        format!("data: {}\n\n", UI_STREAM_DONE)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finish | Self::Error { .. })
    }
}
