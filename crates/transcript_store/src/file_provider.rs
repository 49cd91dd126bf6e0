use async_trait::async_trait;
use chat_core::{Prompt, Transcript};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{Result, StoreError};
use crate::provider::{sort_prompts, sort_transcripts, LibraryProvider};

pub const TRANSCRIPTS_FILE: &str = "transcripts.json";
pub const PROMPTS_FILE: &str = "prompts.json";

/// Reads `transcripts.json` and `prompts.json` from one directory.
///
/// A missing file is an empty list. The files are re-read on every call.
pub struct FileLibraryProvider {
    base_dir: PathBuf,
}

impl FileLibraryProvider {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    async fn read_list<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>> {
        let path = self.base_dir.join(file_name);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Library file does not exist");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        let items: Vec<T> = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            count = items.len(),
            file_size = content.len(),
            "Library file loaded"
        );

        Ok(items)
    }
}

#[async_trait]
impl LibraryProvider for FileLibraryProvider {
    async fn list_transcripts(&self) -> Result<Vec<Transcript>> {
        let mut transcripts: Vec<Transcript> = self.read_list(TRANSCRIPTS_FILE).await?;
        sort_transcripts(&mut transcripts);
        Ok(transcripts)
    }

    async fn list_prompts(&self) -> Result<Vec<Prompt>> {
        let mut prompts: Vec<Prompt> = self.read_list(PROMPTS_FILE).await?;
        sort_prompts(&mut prompts);
        Ok(prompts)
    }
}
