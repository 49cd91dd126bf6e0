//! chat_state - Conversation derivation and the assistant state machine
//!
//! This crate turns the flat chat message log into labeled conversations,
//! decides what each prompt button shows, and owns the reducer that every
//! user and network event flows through.

pub mod buttons;
pub mod conversation;
pub mod follow;
pub mod labels;
pub mod machine;
pub mod view;

// Re-export commonly used types
pub use buttons::{prompt_button_state, ButtonContext, PromptButtonState};
pub use conversation::{conversations_by_label, derive_conversations, truncate_title, Conversation};
pub use follow::follow_latest;
pub use labels::PromptLabels;
pub use machine::{
    reduce, AssistantEvent, AssistantMachine, AssistantState, ChatStatus, Effect, GenerationId,
    TransitionRecord,
};
pub use view::{ButtonIcon, ButtonView, ControlPanel, PipContent};
