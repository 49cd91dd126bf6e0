//! Conversation derivation - projects the message log into prompt/response pairs
//!
//! Conversations are never stored. They are recomputed from the message log
//! and the prompt label map whenever either changes.

use std::collections::HashMap;

use chat_core::Message;
use serde::{Deserialize, Serialize};

use crate::labels::PromptLabels;

/// Maximum number of characters kept from a user prompt used as a title.
pub const TITLE_MAX_CHARS: usize = 30;

/// One user prompt and the assistant reply that followed it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Conversation {
    /// Id of the assistant message
    pub id: String,
    /// Prompt label, or the truncated user prompt when no label was recorded
    pub title: String,
    pub user_prompt: String,
    pub ai_response: String,
    /// Assistant message creation time in epoch milliseconds, 0 when unknown
    pub timestamp: i64,
}

/// Derive conversations from the message log.
///
/// Every assistant message whose predecessor is a user message yields one
/// conversation, in log order. Assistant messages without a preceding user
/// message are skipped.
pub fn derive_conversations(messages: &[Message], labels: &PromptLabels) -> Vec<Conversation> {
    messages
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, message)| message.is_assistant())
        .filter_map(|(i, message)| {
            let user_message = &messages[i - 1];
            if !user_message.is_user() {
                return None;
            }

            let user_prompt = user_message.text();
            let title = match labels.get(&message.id) {
                Some(label) if !label.is_empty() => label.to_string(),
                _ => truncate_title(&user_prompt),
            };

            Some(Conversation {
                id: message.id.clone(),
                title,
                ai_response: message.text(),
                user_prompt,
                timestamp: message
                    .created_at
                    .map(|t| t.timestamp_millis())
                    .unwrap_or(0),
            })
        })
        .collect()
}

/// First [`TITLE_MAX_CHARS`] characters, with `...` appended only when cut.
pub fn truncate_title(prompt: &str) -> String {
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Index conversations by title. Later conversations win on duplicate titles.
pub fn conversations_by_label(conversations: &[Conversation]) -> HashMap<&str, &Conversation> {
    conversations
        .iter()
        .map(|conv| (conv.title.as_str(), conv))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::{Message, Role};

    fn user(id: &str, text: &str) -> Message {
        Message::new(Role::User, text).with_id(id)
    }

    fn assistant(id: &str, text: &str) -> Message {
        Message::new(Role::Assistant, text).with_id(id)
    }

    #[test]
    fn test_pairs_assistant_with_preceding_user() {
        let messages = vec![user("u1", "Summarize"), assistant("a1", "Summary")];
        let mut labels = PromptLabels::default();
        labels.associate("a1", "Goal");

        let convos = derive_conversations(&messages, &labels);

        assert_eq!(convos.len(), 1);
        assert_eq!(convos[0].id, "a1");
        assert_eq!(convos[0].title, "Goal");
        assert_eq!(convos[0].user_prompt, "Summarize");
        assert_eq!(convos[0].ai_response, "Summary");
    }

    #[test]
    fn test_orphan_assistant_messages_are_dropped() {
        let messages = vec![
            assistant("a0", "hello"),
            user("u1", "question"),
            assistant("a1", "answer"),
            assistant("a2", "follow-up without a prompt"),
        ];

        let convos = derive_conversations(&messages, &PromptLabels::default());

        assert_eq!(convos.len(), 1);
        assert_eq!(convos[0].id, "a1");
    }

    #[test]
    fn test_title_falls_back_to_truncated_prompt() {
        let prompt = "abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHI";
        assert_eq!(prompt.chars().count(), 45);
        let messages = vec![user("u1", prompt), assistant("a1", "ok")];

        let convos = derive_conversations(&messages, &PromptLabels::default());

        assert_eq!(convos[0].title, "abcdefghijklmnopqrstuvwxyz0123...");
    }

    #[test]
    fn test_short_prompt_title_has_no_ellipsis() {
        assert_eq!(truncate_title("short"), "short");
        let exactly_thirty = "x".repeat(30);
        assert_eq!(truncate_title(&exactly_thirty), exactly_thirty);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let prompt = "é".repeat(31);
        assert_eq!(truncate_title(&prompt), format!("{}...", "é".repeat(30)));
    }

    #[test]
    fn test_empty_label_falls_back_to_prompt() {
        let messages = vec![user("u1", "Prompt text"), assistant("a1", "ok")];
        let mut labels = PromptLabels::default();
        labels.associate("a1", "");

        let convos = derive_conversations(&messages, &labels);
        assert_eq!(convos[0].title, "Prompt text");
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let messages = vec![
            user("u1", "one"),
            assistant("a1", "first"),
            user("u2", "two"),
            assistant("a2", "second"),
        ];
        let labels = PromptLabels::default();

        let first = derive_conversations(&messages, &labels);
        let second = derive_conversations(&messages, &labels);
        assert_eq!(first, second);
    }

    #[test]
    fn test_repeated_prompts_are_not_deduplicated() {
        let messages = vec![
            user("u1", "same"),
            assistant("a1", "first"),
            user("u2", "same"),
            assistant("a2", "second"),
        ];

        let convos = derive_conversations(&messages, &PromptLabels::default());
        assert_eq!(convos.len(), 2);

        let by_label = conversations_by_label(&convos);
        assert_eq!(by_label.len(), 1);
        assert_eq!(by_label["same"].id, "a2");
    }

    #[test]
    fn test_only_text_parts_are_concatenated() {
        let mut reply = assistant("a1", "Hello");
        reply.parts.push(chat_core::MessagePart::Reasoning {
            text: "hidden".to_string(),
        });
        reply.parts.push(chat_core::MessagePart::text(" world"));
        let messages = vec![user("u1", "hi"), reply];

        let convos = derive_conversations(&messages, &PromptLabels::default());
        assert_eq!(convos[0].ai_response, "Hello world");
    }
}
