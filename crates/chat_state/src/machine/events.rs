//! Assistant events - Inputs to the reducer and the effects it asks for

use std::fmt;

use chat_core::{Message, Prompt, Transcript};
use serde::{Deserialize, Serialize};

/// Identifies one request to the completion gateway.
///
/// Reply events carry the id of the generation that produced them so late
/// events from an abandoned generation can be recognised and dropped.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationId(pub u64);

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// Defines the events that can change the assistant state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantEvent {
    // ========== Library Events ==========
    /// Transcripts and prompts finished loading.
    LibraryLoaded {
        transcripts: Vec<Transcript>,
        prompts: Vec<Prompt>,
    },

    /// A library read failed. Follows the `LibraryLoaded` carrying whatever was read.
    LibraryLoadFailed { error: String },

    // ========== User Events ==========
    /// User picked a transcript.
    TranscriptSelected { id: String },

    /// User clicked a prompt button.
    PromptClicked { label: String },

    /// User picked a conversation tab directly.
    ConversationSelected { id: String },

    // ========== Reply Events ==========
    /// The gateway opened the assistant message.
    ReplyStarted {
        generation: GenerationId,
        message_id: String,
    },

    /// Incremental assistant text.
    ReplyDelta {
        generation: GenerationId,
        delta: String,
    },

    /// The reply completed.
    ReplyFinished { generation: GenerationId },

    /// The reply failed in transport or upstream.
    ReplyFailed {
        generation: GenerationId,
        error: String,
    },
}

impl AssistantEvent {
    /// The generation a reply event belongs to.
    pub fn generation(&self) -> Option<GenerationId> {
        match self {
            Self::ReplyStarted { generation, .. }
            | Self::ReplyDelta { generation, .. }
            | Self::ReplyFinished { generation }
            | Self::ReplyFailed { generation, .. } => Some(*generation),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LibraryLoaded { .. } => "library_loaded",
            Self::LibraryLoadFailed { .. } => "library_load_failed",
            Self::TranscriptSelected { .. } => "transcript_selected",
            Self::PromptClicked { .. } => "prompt_clicked",
            Self::ConversationSelected { .. } => "conversation_selected",
            Self::ReplyStarted { .. } => "reply_started",
            Self::ReplyDelta { .. } => "reply_delta",
            Self::ReplyFinished { .. } => "reply_finished",
            Self::ReplyFailed { .. } => "reply_failed",
        }
    }
}

/// Work the reducer asks its driver to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the full message log to the completion gateway.
    Submit {
        generation: GenerationId,
        messages: Vec<Message>,
    },

    /// Abort an in-flight generation.
    Cancel { generation: GenerationId },
}
