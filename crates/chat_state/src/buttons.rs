//! Prompt button states
//!
//! Single source of truth for what each prompt button shows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::conversation::Conversation;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PromptButtonState {
    /// Not generated yet
    Idle,
    /// Currently generating
    Loading,
    /// Generated but not being viewed
    Complete,
    /// Generated and currently viewed
    Active,
    /// Cannot interact
    Disabled,
}

impl PromptButtonState {
    /// Loading buttons cannot be clicked either.
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled | Self::Loading)
    }
}

/// Everything the button state depends on.
#[derive(Debug, Clone, Copy)]
pub struct ButtonContext<'a> {
    pub transcript_selected: bool,
    pub conversations_by_label: &'a HashMap<&'a str, &'a Conversation>,
    pub generating_label: Option<&'a str>,
    pub is_loading: bool,
    pub active_conversation_id: Option<&'a str>,
}

/// Evaluate the button rules top to bottom; the first match wins.
pub fn prompt_button_state(ctx: &ButtonContext<'_>, label: &str) -> PromptButtonState {
    if !ctx.transcript_selected {
        return PromptButtonState::Disabled;
    }

    let existing = ctx.conversations_by_label.get(label);
    let is_this_generating = ctx.generating_label == Some(label);

    if is_this_generating && ctx.is_loading {
        return PromptButtonState::Loading;
    }

    if ctx.is_loading {
        return PromptButtonState::Disabled;
    }

    match existing {
        Some(conv) if Some(conv.id.as_str()) == ctx.active_conversation_id => {
            PromptButtonState::Active
        }
        Some(_) => PromptButtonState::Complete,
        None => PromptButtonState::Idle,
    }
}
