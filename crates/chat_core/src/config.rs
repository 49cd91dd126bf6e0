use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-5-nano-2025-08-07";
pub const DEFAULT_REASONING_EFFORT: &str = "minimal";
pub const DEFAULT_MAX_DURATION_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Provider credential. Absence fails every relay request, not startup.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub reasoning_effort: Option<String>,
    /// Upper bound on one streamed response
    pub max_duration_secs: u64,
    pub library_dir: PathBuf,
    pub port: u16,
}

const CONFIG_FILE_PATH: &str = "config.toml";

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            reasoning_effort: Some(DEFAULT_REASONING_EFFORT.to_string()),
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            library_dir: paths::library_dir(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, then apply environment overrides.
    pub fn new() -> Self {
        Self::load_from(Path::new(CONFIG_FILE_PATH), |key| std::env::var(key).ok())
    }

    pub fn load_from<F>(path: &Path, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<Config>(&content) {
                    Ok(file_config) => config = file_config,
                    Err(e) => tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Ignoring unparsable config file"
                    ),
                },
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read config file"
                ),
            }
        }

        if let Some(api_key) = env(API_KEY_ENV) {
            config.api_key = Some(api_key);
        }
        if let Some(api_base) = env("OPENAI_BASE_URL") {
            config.api_base = api_base;
        }
        if let Some(model) = env("OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(effort) = env("OPENAI_REASONING_EFFORT") {
            config.reasoning_effort = Some(effort).filter(|e| !e.trim().is_empty());
        }
        if let Some(secs) = env("CHAT_MAX_DURATION_SECS").and_then(|v| v.parse().ok()) {
            config.max_duration_secs = secs;
        }
        if let Some(dir) = env("LIBRARY_DIR") {
            config.library_dir = PathBuf::from(dir);
        }
        if let Some(port) = env("APP_PORT").and_then(|v| v.parse().ok()) {
            config.port = port;
        }
        config
    }

    /// The credential, if it is set and non-empty. The value is used as given.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml"), env_of(&[]));
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_duration_secs, 30);
        assert_eq!(config.reasoning_effort.as_deref(), Some("minimal"));
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = \"from-file\"\nport = 9000\n").unwrap();

        let config = Config::load_from(
            &path,
            env_of(&[("OPENAI_API_KEY", "sk-test"), ("OPENAI_MODEL", "from-env")]),
        );
        assert_eq!(config.model, "from-env");
        assert_eq!(config.port, 9000);
        assert_eq!(config.credential(), Some("sk-test"));
    }

    #[test]
    fn only_empty_credential_counts_as_missing() {
        assert_eq!(Config::default().with_api_key("").credential(), None);
        assert_eq!(
            Config::default().with_api_key("  sk-test ").credential(),
            Some("  sk-test ")
        );
    }

    #[test]
    fn empty_reasoning_effort_disables_it() {
        let config = Config::load_from(
            Path::new("/nonexistent/config.toml"),
            env_of(&[("OPENAI_REASONING_EFFORT", "")]),
        );
        assert_eq!(config.reasoning_effort, None);
    }
}
