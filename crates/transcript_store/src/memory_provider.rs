use async_trait::async_trait;
use chat_core::{Prompt, Transcript};
use parking_lot::RwLock;

use crate::error::{Result, StoreError};
use crate::provider::{sort_prompts, sort_transcripts, LibraryProvider};

/// Library held in memory, for demos and tests.
#[derive(Default)]
pub struct InMemoryLibraryProvider {
    transcripts: RwLock<Vec<Transcript>>,
    prompts: RwLock<Vec<Prompt>>,
    failure: RwLock<Option<String>>,
}

impl InMemoryLibraryProvider {
    pub fn new(transcripts: Vec<Transcript>, prompts: Vec<Prompt>) -> Self {
        Self {
            transcripts: RwLock::new(transcripts),
            prompts: RwLock::new(prompts),
            failure: RwLock::new(None),
        }
    }

    /// Make every read fail with `message` until cleared with `None`.
    pub fn set_failure(&self, message: Option<String>) {
        *self.failure.write() = message;
    }

    fn check(&self) -> Result<()> {
        match self.failure.read().as_ref() {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LibraryProvider for InMemoryLibraryProvider {
    async fn list_transcripts(&self) -> Result<Vec<Transcript>> {
        self.check()?;
        let mut transcripts = self.transcripts.read().clone();
        sort_transcripts(&mut transcripts);
        Ok(transcripts)
    }

    async fn list_prompts(&self) -> Result<Vec<Prompt>> {
        self.check()?;
        let mut prompts = self.prompts.read().clone();
        sort_prompts(&mut prompts);
        Ok(prompts)
    }
}
