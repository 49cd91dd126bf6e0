use async_trait::async_trait;
use chat_core::{Prompt, Transcript};

use crate::error::Result;

#[async_trait]
pub trait LibraryProvider: Send + Sync {
    /// All transcripts, most recently created first.
    async fn list_transcripts(&self) -> Result<Vec<Transcript>>;

    /// All prompts, ascending by `order`.
    async fn list_prompts(&self) -> Result<Vec<Prompt>>;
}

pub(crate) fn sort_transcripts(transcripts: &mut [Transcript]) {
    transcripts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

pub(crate) fn sort_prompts(prompts: &mut [Prompt]) {
    prompts.sort_by_key(|p| p.order);
}
