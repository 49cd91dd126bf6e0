use std::path::PathBuf;

/// Application directory (~/.transcript-assistant)
pub fn app_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(".transcript-assistant")
}

/// Default directory holding `transcripts.json` and `prompts.json`
pub fn library_dir() -> PathBuf {
    app_dir().join("library")
}
