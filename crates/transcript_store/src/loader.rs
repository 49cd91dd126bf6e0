use chat_core::{Prompt, Transcript};

use crate::provider::LibraryProvider;

/// Result of loading the library. Lists that failed to load are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedLibrary {
    pub transcripts: Vec<Transcript>,
    pub prompts: Vec<Prompt>,
    /// First failure, already logged
    pub error: Option<String>,
}

/// Load transcripts, then prompts. Failures are logged and never returned.
///
/// A prompt failure keeps the transcripts that were already read.
pub async fn load_library(provider: &dyn LibraryProvider) -> LoadedLibrary {
    let mut library = LoadedLibrary::default();

    match provider.list_transcripts().await {
        Ok(transcripts) => library.transcripts = transcripts,
        Err(e) => {
            tracing::error!(error = %e, "Error fetching transcripts");
            library.error = Some(e.to_string());
            return library;
        }
    }

    match provider.list_prompts().await {
        Ok(prompts) => library.prompts = prompts,
        Err(e) => {
            tracing::error!(error = %e, "Error fetching prompts");
            library.error = Some(e.to_string());
        }
    }

    tracing::info!(
        transcripts = library.transcripts.len(),
        prompts = library.prompts.len(),
        "Library loaded"
    );

    library
}
