//! MessagePart - Typed fragments of a message
//!
//! Only text fragments are consumed by the assistant. Every other fragment
//! type a client may send (reasoning, step markers, files, tool calls) is
//! accepted and carried without interpretation.

use serde::{Deserialize, Serialize};

/// A typed fragment of message content
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MessagePart {
    /// Text content
    Text { text: String },

    /// Model reasoning, never shown as the response
    Reasoning { text: String },

    /// Any fragment type we do not consume
    #[serde(other)]
    Other,
}

impl MessagePart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Get text content if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}
