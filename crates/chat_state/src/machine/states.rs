//! Assistant state - Everything the UI renders from

use chat_core::{Message, Prompt, Transcript};
use serde::{Deserialize, Serialize};

use super::events::GenerationId;
use crate::conversation::{derive_conversations, Conversation};
use crate::labels::PromptLabels;

/// Status of the chat session, mirrored from the completion gateway.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChatStatus {
    /// Awaiting user input.
    #[default]
    Ready,
    /// Request sent, no reply text yet.
    Submitted,
    /// Reply text is arriving.
    Streaming,
    /// The last request failed.
    Error { message: String },
}

impl ChatStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Submitted | Self::Streaming)
    }
}

/// Immutable snapshot of the assistant. Only [`super::reduce`] produces new ones.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AssistantState {
    pub transcripts: Vec<Transcript>,
    pub prompts: Vec<Prompt>,
    pub is_loading_library: bool,
    /// Last library read failure; the lists that failed stay empty
    pub library_error: Option<String>,
    pub selected_transcript_id: Option<String>,
    pub active_conversation_id: Option<String>,
    /// At most one outstanding generation
    pub generating_prompt_label: Option<String>,
    /// Distinguishes a manual tab choice from auto-follow
    pub user_selected_tab: bool,
    pub prompt_labels: PromptLabels,
    pub messages: Vec<Message>,
    pub status: ChatStatus,
    /// The generation whose reply events are currently accepted
    pub generation: Option<GenerationId>,
    pub(crate) next_generation: u64,
    /// Bumped whenever the message log or the label map changes
    pub(crate) revision: u64,
}

impl Default for AssistantState {
    fn default() -> Self {
        Self {
            transcripts: Vec::new(),
            prompts: Vec::new(),
            is_loading_library: true,
            library_error: None,
            selected_transcript_id: None,
            active_conversation_id: None,
            generating_prompt_label: None,
            user_selected_tab: false,
            prompt_labels: PromptLabels::default(),
            messages: Vec::new(),
            status: ChatStatus::Ready,
            generation: None,
            next_generation: 0,
            revision: 0,
        }
    }
}

impl AssistantState {
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn selected_transcript(&self) -> Option<&Transcript> {
        let id = self.selected_transcript_id.as_deref()?;
        self.transcripts.iter().find(|t| t.id == id)
    }

    pub fn prompt(&self, label: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.label == label)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ChatStatus::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Revision of the inputs conversations are derived from.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        derive_conversations(&self.messages, &self.prompt_labels)
    }

    pub(crate) fn touch(&mut self) {
        self.revision += 1;
    }

    pub(crate) fn allocate_generation(&mut self) -> GenerationId {
        self.next_generation += 1;
        GenerationId(self.next_generation)
    }
}
