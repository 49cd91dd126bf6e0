//! Prompt label associations
//!
//! Remembers which prompt label produced each assistant message. An entry is
//! written once, the first time its message is seen while a label is generating.

use std::collections::HashMap;

use chat_core::Message;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PromptLabels {
    labels: HashMap<String, String>,
}

impl PromptLabels {
    pub fn get(&self, message_id: &str) -> Option<&str> {
        self.labels.get(message_id).map(String::as_str)
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.labels.contains_key(message_id)
    }

    /// Record a label for `message_id`. Returns `false` and keeps the existing
    /// label when the message already has one.
    pub fn associate(&mut self, message_id: impl Into<String>, label: impl Into<String>) -> bool {
        let message_id = message_id.into();
        if self.labels.contains_key(&message_id) {
            return false;
        }
        self.labels.insert(message_id, label.into());
        true
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    /// Apply the association rule to the current log.
    ///
    /// When the last message is an unlabeled assistant message and a label is
    /// generating, the label is recorded. The generating marker survives while
    /// the reply is still loading and is cleared otherwise. Returns whether an
    /// association was written.
    pub fn observe(
        &mut self,
        messages: &[Message],
        generating_label: &mut Option<String>,
        is_loading: bool,
    ) -> bool {
        let Some(last) = messages.last() else {
            return false;
        };
        if !last.is_assistant() || self.contains(&last.id) {
            return false;
        }
        let Some(label) = generating_label.as_deref() else {
            return false;
        };

        tracing::debug!(message_id = %last.id, label, "Associating prompt label");
        self.associate(last.id.clone(), label);

        if !is_loading {
            *generating_label = None;
        }
        true
    }
}
