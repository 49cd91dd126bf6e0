//! Render models for the control panel, the prompt buttons and the PiP body

use serde::{Deserialize, Serialize};

use crate::buttons::{prompt_button_state, ButtonContext, PromptButtonState};
use crate::conversation::conversations_by_label;
use crate::machine::AssistantMachine;

pub const EMPTY_TITLE: &str = "No Scripts Yet";
pub const EMPTY_HINT: &str = "Click the buttons below to get NBG scripts for your session.";
pub const OPEN_PIP_LABEL: &str = "Open AI PiP Window";
pub const CLOSE_PIP_LABEL: &str = "Close AI PiP Window";

/// What the PiP surface shows above the prompt buttons.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum PipContent {
    /// Nothing generated and nothing loading
    Empty,
    /// Waiting for the first reply text
    Skeleton,
    /// Text of the active conversation
    Response(String),
}

impl PipContent {
    pub fn empty_copy() -> (&'static str, &'static str) {
        (EMPTY_TITLE, EMPTY_HINT)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ButtonIcon {
    Spinner,
    Check,
    None,
}

impl From<PromptButtonState> for ButtonIcon {
    fn from(state: PromptButtonState) -> Self {
        match state {
            PromptButtonState::Loading => Self::Spinner,
            PromptButtonState::Complete | PromptButtonState::Active => Self::Check,
            PromptButtonState::Idle | PromptButtonState::Disabled => Self::None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ButtonView {
    pub label: String,
    pub state: PromptButtonState,
    pub disabled: bool,
    pub icon: ButtonIcon,
}

/// Transcript selector and PiP toggle in the main window.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ControlPanel {
    pub title: String,
    pub selector_disabled: bool,
    pub toggle_label: &'static str,
    pub toggle_disabled: bool,
    pub error: Option<String>,
}

impl AssistantMachine {
    /// One view per prompt, in prompt order.
    pub fn button_views(&self) -> Vec<ButtonView> {
        let state = self.state();
        let conversations = self.conversations();
        let by_label = conversations_by_label(&conversations);
        let ctx = ButtonContext {
            transcript_selected: state.selected_transcript_id.is_some(),
            conversations_by_label: &by_label,
            generating_label: state.generating_prompt_label.as_deref(),
            is_loading: state.is_loading(),
            active_conversation_id: state.active_conversation_id.as_deref(),
        };

        state
            .prompts
            .iter()
            .map(|prompt| {
                let button = prompt_button_state(&ctx, &prompt.label);
                ButtonView {
                    label: prompt.label.clone(),
                    state: button,
                    disabled: button.is_disabled(),
                    icon: button.into(),
                }
            })
            .collect()
    }

    pub fn pip_content(&self) -> PipContent {
        match self.active_conversation() {
            Some(conv) if !conv.ai_response.is_empty() => {
                PipContent::Response(conv.ai_response.clone())
            }
            _ if self.state().is_loading() => PipContent::Skeleton,
            _ => PipContent::Empty,
        }
    }

    /// `pip_supported` and `pip_active` come from the PiP host.
    pub fn control_panel(&self, pip_supported: bool, pip_active: bool) -> ControlPanel {
        let state = self.state();
        let title = if state.is_loading_library {
            "Select Transcript (Loading...)".to_string()
        } else {
            "Select Transcript".to_string()
        };

        ControlPanel {
            title,
            selector_disabled: state.is_loading_library || state.transcripts.is_empty(),
            toggle_label: if pip_active {
                CLOSE_PIP_LABEL
            } else {
                OPEN_PIP_LABEL
            },
            toggle_disabled: !pip_supported,
            error: state.error().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{AssistantEvent, Effect};
    use chat_core::{Prompt, Transcript};
    use chrono::Utc;

    fn machine_with_library() -> AssistantMachine {
        let mut sm = AssistantMachine::new();
        sm.handle_event(AssistantEvent::LibraryLoaded {
            transcripts: vec![Transcript {
                id: "t1".to_string(),
                title: "Session".to_string(),
                content: "text".to_string(),
                created_at: Utc::now(),
            }],
            prompts: vec![
                Prompt {
                    id: "p1".to_string(),
                    label: "Goal".to_string(),
                    template: "{transcript}".to_string(),
                    order: 1,
                },
                Prompt {
                    id: "p2".to_string(),
                    label: "Future Work".to_string(),
                    template: "{transcript}".to_string(),
                    order: 2,
                },
            ],
        });
        sm
    }

    #[test]
    fn test_control_panel_while_library_loads() {
        let sm = AssistantMachine::new();
        let panel = sm.control_panel(true, false);
        assert_eq!(panel.title, "Select Transcript (Loading...)");
        assert!(panel.selector_disabled);
        assert_eq!(panel.toggle_label, OPEN_PIP_LABEL);
        assert!(!panel.toggle_disabled);
    }

    #[test]
    fn test_control_panel_without_pip_support() {
        let sm = machine_with_library();
        let panel = sm.control_panel(false, false);
        assert_eq!(panel.title, "Select Transcript");
        assert!(!panel.selector_disabled);
        assert!(panel.toggle_disabled);
        assert_eq!(sm.control_panel(true, true).toggle_label, CLOSE_PIP_LABEL);
    }

    #[test]
    fn test_buttons_disabled_until_transcript_selected() {
        let sm = machine_with_library();
        let views = sm.button_views();
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| v.disabled && v.icon == ButtonIcon::None));
    }

    #[test]
    fn test_content_moves_from_empty_to_skeleton_to_response() {
        let mut sm = machine_with_library();
        sm.handle_event(AssistantEvent::TranscriptSelected {
            id: "t1".to_string(),
        });
        assert_eq!(sm.pip_content(), PipContent::Empty);

        let effects = sm.handle_event(AssistantEvent::PromptClicked {
            label: "Goal".to_string(),
        });
        let generation = match effects.as_slice() {
            [Effect::Submit { generation, .. }] => *generation,
            other => panic!("expected submit, got {other:?}"),
        };
        assert_eq!(sm.pip_content(), PipContent::Skeleton);

        let views = sm.button_views();
        assert_eq!(views[0].state, PromptButtonState::Loading);
        assert_eq!(views[0].icon, ButtonIcon::Spinner);
        assert_eq!(views[1].state, PromptButtonState::Disabled);

        sm.handle_event(AssistantEvent::ReplyStarted {
            generation,
            message_id: "a1".to_string(),
        });
        assert_eq!(sm.pip_content(), PipContent::Skeleton);

        sm.handle_event(AssistantEvent::ReplyDelta {
            generation,
            delta: "Script".to_string(),
        });
        sm.handle_event(AssistantEvent::ReplyFinished { generation });

        assert_eq!(sm.pip_content(), PipContent::Response("Script".to_string()));
        let views = sm.button_views();
        assert_eq!(views[0].state, PromptButtonState::Active);
        assert_eq!(views[0].icon, ButtonIcon::Check);
        assert_eq!(views[1].state, PromptButtonState::Idle);
        assert!(!views[1].disabled);
    }

    #[test]
    fn test_empty_copy() {
        assert_eq!(
            PipContent::empty_copy(),
            ("No Scripts Yet", "Click the buttons below to get NBG scripts for your session.")
        );
    }
}
