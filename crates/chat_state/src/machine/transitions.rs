//! State transitions - The assistant reducer
//!
//! `reduce` is the only place state changes. It is a pure function of the
//! previous state and one event; side effects are returned, never performed.

use std::collections::VecDeque;
use std::sync::Arc;

use chat_core::Message;
use uuid::Uuid;

use super::events::{AssistantEvent, Effect, GenerationId};
use super::states::{AssistantState, ChatStatus};
use crate::conversation::{conversations_by_label, derive_conversations, Conversation};
use crate::follow::follow_latest;

/// Apply one event to the state.
pub fn reduce(mut state: AssistantState, event: AssistantEvent) -> (AssistantState, Vec<Effect>) {
    use AssistantEvent::*;

    let mut effects = Vec::new();

    if let Some(generation) = event.generation() {
        if state.generation != Some(generation) {
            tracing::debug!(
                %generation,
                current = ?state.generation,
                event = event.name(),
                "Dropping reply event from an abandoned generation"
            );
            return (state, effects);
        }
    }

    let mut finished = false;

    match event {
        // ========== Library ==========
        LibraryLoaded {
            transcripts,
            prompts,
        } => {
            state.transcripts = transcripts;
            state.prompts = prompts;
            state.prompts.sort_by_key(|p| p.order);
            state.is_loading_library = false;
            state.library_error = None;
        }

        LibraryLoadFailed { error } => {
            tracing::debug!(error = %error, "Library load failed");
            state.is_loading_library = false;
            state.library_error = Some(error);
        }

        // ========== User Actions ==========
        TranscriptSelected { id } => {
            if state.selected_transcript_id.as_deref() != Some(id.as_str()) {
                if let Some(generation) = state.generation.take() {
                    effects.push(Effect::Cancel { generation });
                }
                state.selected_transcript_id = Some(id);
                state.active_conversation_id = None;
                state.prompt_labels.clear();
                state.generating_prompt_label = None;
                state.user_selected_tab = false;
                state.messages.clear();
                state.status = ChatStatus::Ready;
                state.touch();
            }
        }

        PromptClicked { label } => {
            if let Some(effect) = click_prompt(&mut state, &label) {
                effects.push(effect);
            }
        }

        ConversationSelected { id } => {
            if state.conversations().iter().any(|c| c.id == id) {
                state.user_selected_tab = true;
                state.active_conversation_id = Some(id);
            }
        }

        // ========== Reply Stream ==========
        ReplyStarted { message_id, .. } => {
            let already_open = state
                .messages
                .last()
                .is_some_and(|m| m.is_assistant() && m.id == message_id);
            if !already_open {
                state
                    .messages
                    .push(Message::assistant_placeholder(message_id));
            }
            state.status = ChatStatus::Streaming;
            state.touch();
        }

        ReplyDelta { delta, .. } => {
            let needs_message = !state
                .messages
                .last()
                .is_some_and(|m| m.is_assistant());
            if needs_message {
                state
                    .messages
                    .push(Message::assistant_placeholder(Uuid::new_v4().to_string()));
            }
            if let Some(last) = state.messages.last_mut() {
                last.push_text(&delta);
            }
            state.status = ChatStatus::Streaming;
            state.touch();
        }

        ReplyFinished { .. } => {
            state.status = ChatStatus::Ready;
            state.generation = None;
            finished = true;
        }

        ReplyFailed { error, .. } => {
            tracing::warn!(error = %error, "Generation failed");
            state.status = ChatStatus::Error { message: error };
            state.generation = None;
            finished = true;
        }
    }

    let is_loading = state.is_loading();
    if state
        .prompt_labels
        .observe(&state.messages, &mut state.generating_prompt_label, is_loading)
    {
        state.touch();
    }
    if finished {
        state.generating_prompt_label = None;
    }

    let conversations = state.conversations();
    state.active_conversation_id = follow_latest(
        &conversations,
        state.active_conversation_id.as_deref(),
        state.user_selected_tab,
    );

    (state, effects)
}

/// Smart prompt button: switch to an existing result or start a new one.
fn click_prompt(state: &mut AssistantState, label: &str) -> Option<Effect> {
    let Some(transcript) = state.selected_transcript() else {
        tracing::debug!(label, "Prompt clicked without a transcript");
        return None;
    };

    let conversations = derive_conversations(&state.messages, &state.prompt_labels);
    let existing = conversations_by_label(&conversations)
        .get(label)
        .map(|conv| conv.id.clone());

    if let Some(id) = existing {
        state.user_selected_tab = true;
        state.active_conversation_id = Some(id);
        return None;
    }

    if state.is_loading() {
        tracing::debug!(label, "Ignoring click while another prompt is generating");
        return None;
    }

    let Some(prompt) = state.prompt(label) else {
        tracing::warn!(label, "Clicked prompt is not in the library");
        return None;
    };

    let processed = prompt.fill(transcript);
    tracing::debug!(
        label,
        prompt_len = processed.len(),
        transcript_len = transcript.content.len(),
        "Sending prompt"
    );

    state.user_selected_tab = false;
    state.generating_prompt_label = Some(label.to_string());
    state.messages.push(Message::user(processed));
    state.status = ChatStatus::Submitted;
    state.touch();

    let generation = state.allocate_generation();
    state.generation = Some(generation);

    Some(Effect::Submit {
        generation,
        messages: state.messages.clone(),
    })
}

/// Summary of one handled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRecord {
    pub event: &'static str,
    pub from: ChatStatus,
    pub to: ChatStatus,
    pub effects: usize,
}

/// Owns the current state, a bounded transition history and the memoized
/// conversation projection.
#[derive(Debug, Clone)]
pub struct AssistantMachine {
    state: AssistantState,
    history: VecDeque<TransitionRecord>,
    max_history: usize,
    conversations: Arc<Vec<Conversation>>,
    conversations_revision: u64,
}

impl Default for AssistantMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistantMachine {
    pub fn new() -> Self {
        Self::with_state(AssistantState::default())
    }

    pub fn with_state(state: AssistantState) -> Self {
        let conversations = Arc::new(state.conversations());
        let conversations_revision = state.revision();
        Self {
            state,
            history: VecDeque::new(),
            max_history: 50,
            conversations,
            conversations_revision,
        }
    }

    pub fn state(&self) -> &AssistantState {
        &self.state
    }

    pub fn history(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.history.iter()
    }

    /// Derived conversations, recomputed only when the log or labels changed.
    pub fn conversations(&self) -> Arc<Vec<Conversation>> {
        Arc::clone(&self.conversations)
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        let id = self.state.active_conversation_id.as_deref()?;
        self.conversations.iter().find(|c| c.id == id)
    }

    /// Handle an event and return the effects to perform.
    pub fn handle_event(&mut self, event: AssistantEvent) -> Vec<Effect> {
        let name = event.name();
        let from = self.state.status.clone();

        let (next, effects) = reduce(std::mem::take(&mut self.state), event);
        self.state = next;

        if self.state.revision() != self.conversations_revision {
            self.conversations = Arc::new(self.state.conversations());
            self.conversations_revision = self.state.revision();
        }

        self.history.push_back(TransitionRecord {
            event: name,
            from,
            to: self.state.status.clone(),
            effects: effects.len(),
        });
        if self.history.len() > self.max_history {
            self.history.pop_front();
        }

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::{Prompt, Transcript};
    use chrono::Utc;

    fn library() -> AssistantEvent {
        AssistantEvent::LibraryLoaded {
            transcripts: vec![
                Transcript {
                    id: "t1".to_string(),
                    title: "Session one".to_string(),
                    content: "hello world".to_string(),
                    created_at: Utc::now(),
                },
                Transcript {
                    id: "t2".to_string(),
                    title: "Session two".to_string(),
                    content: "second".to_string(),
                    created_at: Utc::now(),
                },
            ],
            prompts: vec![
                Prompt {
                    id: "p2".to_string(),
                    label: "Future Work".to_string(),
                    template: "Plan: {transcript}".to_string(),
                    order: 2,
                },
                Prompt {
                    id: "p1".to_string(),
                    label: "Goal".to_string(),
                    template: "Summarize: {transcript}".to_string(),
                    order: 1,
                },
                Prompt {
                    id: "p3".to_string(),
                    label: "Summary".to_string(),
                    template: "Recap: {transcript}".to_string(),
                    order: 3,
                },
            ],
        }
    }

    fn ready_machine() -> AssistantMachine {
        let mut sm = AssistantMachine::new();
        sm.handle_event(library());
        sm.handle_event(AssistantEvent::TranscriptSelected {
            id: "t1".to_string(),
        });
        sm
    }

    fn submit(sm: &mut AssistantMachine, label: &str) -> GenerationId {
        let effects = sm.handle_event(AssistantEvent::PromptClicked {
            label: label.to_string(),
        });
        match effects.as_slice() {
            [Effect::Submit { generation, .. }] => *generation,
            other => panic!("expected one submit effect, got {other:?}"),
        }
    }

    fn complete(sm: &mut AssistantMachine, generation: GenerationId, id: &str, text: &str) {
        sm.handle_event(AssistantEvent::ReplyStarted {
            generation,
            message_id: id.to_string(),
        });
        sm.handle_event(AssistantEvent::ReplyDelta {
            generation,
            delta: text.to_string(),
        });
        sm.handle_event(AssistantEvent::ReplyFinished { generation });
    }

    #[test]
    fn test_library_prompts_sorted_by_order() {
        let sm = ready_machine();
        let labels: Vec<_> = sm.state().prompts.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Goal", "Future Work", "Summary"]);
        assert!(!sm.state().is_loading_library);
    }

    #[test]
    fn test_library_failure_is_recorded_until_next_load() {
        let mut sm = AssistantMachine::new();
        sm.handle_event(AssistantEvent::LibraryLoadFailed {
            error: "Library unavailable: offline".to_string(),
        });
        assert!(!sm.state().is_loading_library);
        assert_eq!(
            sm.state().library_error.as_deref(),
            Some("Library unavailable: offline")
        );
        assert!(sm.state().transcripts.is_empty());

        sm.handle_event(library());
        assert_eq!(sm.state().library_error, None);
        assert_eq!(sm.state().transcripts.len(), 2);
    }

    #[test]
    fn test_click_without_transcript_is_noop() {
        let mut sm = AssistantMachine::new();
        sm.handle_event(library());
        let effects = sm.handle_event(AssistantEvent::PromptClicked {
            label: "Goal".to_string(),
        });
        assert!(effects.is_empty());
        assert!(sm.state().messages.is_empty());
    }

    #[test]
    fn test_click_fills_template_and_submits_full_log() {
        let mut sm = ready_machine();
        let effects = sm.handle_event(AssistantEvent::PromptClicked {
            label: "Goal".to_string(),
        });

        let [Effect::Submit { messages, .. }] = effects.as_slice() else {
            panic!("expected submit");
        };
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text(), "Summarize: hello world");
        assert_eq!(sm.state().status, ChatStatus::Submitted);
        assert_eq!(sm.state().generating_prompt_label.as_deref(), Some("Goal"));
    }

    #[test]
    fn test_streamed_reply_becomes_labeled_conversation() {
        let mut sm = ready_machine();
        let generation = submit(&mut sm, "Goal");

        sm.handle_event(AssistantEvent::ReplyStarted {
            generation,
            message_id: "a1".to_string(),
        });
        assert_eq!(sm.state().prompt_labels.get("a1"), Some("Goal"));
        assert_eq!(sm.state().generating_prompt_label.as_deref(), Some("Goal"));

        sm.handle_event(AssistantEvent::ReplyDelta {
            generation,
            delta: "Part ".to_string(),
        });
        sm.handle_event(AssistantEvent::ReplyDelta {
            generation,
            delta: "two".to_string(),
        });
        sm.handle_event(AssistantEvent::ReplyFinished { generation });

        let convos = sm.conversations();
        assert_eq!(convos.len(), 1);
        assert_eq!(convos[0].title, "Goal");
        assert_eq!(convos[0].ai_response, "Part two");
        assert_eq!(sm.state().active_conversation_id.as_deref(), Some("a1"));
        assert_eq!(sm.state().generating_prompt_label, None);
        assert_eq!(sm.state().status, ChatStatus::Ready);
    }

    #[test]
    fn test_click_while_generating_is_noop() {
        let mut sm = ready_machine();
        submit(&mut sm, "Goal");

        let effects = sm.handle_event(AssistantEvent::PromptClicked {
            label: "Future Work".to_string(),
        });
        assert!(effects.is_empty());
        assert_eq!(sm.state().messages.len(), 1);
        assert_eq!(sm.state().generating_prompt_label.as_deref(), Some("Goal"));
    }

    #[test]
    fn test_click_existing_switches_without_network() {
        let mut sm = ready_machine();
        let g1 = submit(&mut sm, "Goal");
        complete(&mut sm, g1, "a1", "goal text");
        let g2 = submit(&mut sm, "Future Work");
        complete(&mut sm, g2, "a2", "future text");
        assert_eq!(sm.state().active_conversation_id.as_deref(), Some("a2"));

        let effects = sm.handle_event(AssistantEvent::PromptClicked {
            label: "Goal".to_string(),
        });
        assert!(effects.is_empty());
        assert!(sm.state().user_selected_tab);
        assert_eq!(sm.state().active_conversation_id.as_deref(), Some("a1"));
        assert_eq!(sm.active_conversation().unwrap().ai_response, "goal text");
    }

    #[test]
    fn test_auto_follow_moves_to_newest() {
        let mut sm = ready_machine();
        let g1 = submit(&mut sm, "Goal");
        complete(&mut sm, g1, "a1", "one");
        let g2 = submit(&mut sm, "Future Work");
        complete(&mut sm, g2, "a2", "two");
        assert_eq!(sm.conversations().len(), 2);

        let g3 = submit(&mut sm, "Summary");
        complete(&mut sm, g3, "a3", "three");

        assert_eq!(sm.state().active_conversation_id.as_deref(), Some("a3"));
    }

    #[test]
    fn test_manual_selection_survives_unrelated_reply() {
        let mut sm = ready_machine();
        let g1 = submit(&mut sm, "Goal");
        complete(&mut sm, g1, "a1", "one");
        let g2 = submit(&mut sm, "Future Work");
        sm.handle_event(AssistantEvent::ReplyStarted {
            generation: g2,
            message_id: "a2".to_string(),
        });

        sm.handle_event(AssistantEvent::ConversationSelected {
            id: "a1".to_string(),
        });
        sm.handle_event(AssistantEvent::ReplyDelta {
            generation: g2,
            delta: "two".to_string(),
        });
        sm.handle_event(AssistantEvent::ReplyFinished { generation: g2 });

        assert_eq!(sm.conversations().len(), 2);
        assert_eq!(sm.state().active_conversation_id.as_deref(), Some("a1"));
    }

    #[test]
    fn test_transcript_switch_clears_state_and_cancels() {
        let mut sm = ready_machine();
        let generation = submit(&mut sm, "Goal");

        let effects = sm.handle_event(AssistantEvent::TranscriptSelected {
            id: "t2".to_string(),
        });

        assert_eq!(effects, vec![Effect::Cancel { generation }]);
        assert!(sm.state().messages.is_empty());
        assert!(sm.state().prompt_labels.is_empty());
        assert_eq!(sm.state().generating_prompt_label, None);
        assert_eq!(sm.state().active_conversation_id, None);
        assert!(!sm.state().is_loading());
    }

    #[test]
    fn test_stale_reply_events_are_ignored() {
        let mut sm = ready_machine();
        let generation = submit(&mut sm, "Goal");
        sm.handle_event(AssistantEvent::TranscriptSelected {
            id: "t2".to_string(),
        });

        sm.handle_event(AssistantEvent::ReplyStarted {
            generation,
            message_id: "late".to_string(),
        });
        sm.handle_event(AssistantEvent::ReplyDelta {
            generation,
            delta: "late text".to_string(),
        });

        assert!(sm.state().messages.is_empty());
        assert!(sm.conversations().is_empty());
    }

    #[test]
    fn test_reselecting_same_transcript_keeps_state() {
        let mut sm = ready_machine();
        let g1 = submit(&mut sm, "Goal");
        complete(&mut sm, g1, "a1", "one");

        let effects = sm.handle_event(AssistantEvent::TranscriptSelected {
            id: "t1".to_string(),
        });
        assert!(effects.is_empty());
        assert_eq!(sm.conversations().len(), 1);
    }

    #[test]
    fn test_failure_surfaces_error_and_allows_retry() {
        let mut sm = ready_machine();
        let generation = submit(&mut sm, "Goal");
        sm.handle_event(AssistantEvent::ReplyFailed {
            generation,
            error: "upstream down".to_string(),
        });

        assert_eq!(sm.state().error(), Some("upstream down"));
        assert_eq!(sm.state().generating_prompt_label, None);

        let retry = submit(&mut sm, "Goal");
        assert_ne!(retry, generation);
        assert_eq!(sm.state().error(), None);
    }

    #[test]
    fn test_delta_without_start_opens_assistant_message() {
        let mut sm = ready_machine();
        let generation = submit(&mut sm, "Goal");
        sm.handle_event(AssistantEvent::ReplyDelta {
            generation,
            delta: "hi".to_string(),
        });

        let convos = sm.conversations();
        assert_eq!(convos.len(), 1);
        assert_eq!(convos[0].title, "Goal");
        assert_eq!(convos[0].ai_response, "hi");
    }

    #[test]
    fn test_memoized_projection_reused_when_log_unchanged() {
        let mut sm = ready_machine();
        let g1 = submit(&mut sm, "Goal");
        complete(&mut sm, g1, "a1", "one");

        let before = sm.conversations();
        sm.handle_event(AssistantEvent::ConversationSelected {
            id: "a1".to_string(),
        });
        let after = sm.conversations();

        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(*before, sm.state().conversations());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut sm = AssistantMachine::new();
        for _ in 0..60 {
            sm.handle_event(AssistantEvent::LibraryLoadFailed {
                error: "offline".to_string(),
            });
        }
        assert_eq!(sm.history().count(), 50);
    }
}
