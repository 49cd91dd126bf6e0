//! Prompt templates and transcripts supplied by the read-only library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the selected transcript's content.
pub const TRANSCRIPT_PLACEHOLDER: &str = "{transcript}";

/// A named prompt template shown as one button.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub id: String,
    /// Unique display name, also used as the conversation title
    pub label: String,
    pub template: String,
    #[serde(default)]
    pub order: i32,
}

impl Prompt {
    /// Substitute the transcript into the first `{transcript}` placeholder.
    ///
    /// Templates without the placeholder are sent unchanged.
    pub fn fill(&self, transcript: &Transcript) -> String {
        self.template
            .replacen(TRANSCRIPT_PLACEHOLDER, &transcript.content, 1)
    }
}

/// A stored block of source text the user analyzes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}
