//! Server settings read from the environment.
//!
//! - `APP_HOST`: interface to bind (default: 127.0.0.1)
//! - `APP_WORKERS`: actix worker count (default: 10)

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_WORKER_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub workers: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            workers: DEFAULT_WORKER_COUNT,
        }
    }
}

pub fn load_server_settings() -> ServerSettings {
    load_server_settings_from(|key| std::env::var(key).ok())
}

pub fn load_server_settings_from<F>(env: F) -> ServerSettings
where
    F: Fn(&str) -> Option<String>,
{
    ServerSettings {
        host: env("APP_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        workers: env("APP_WORKERS")
            .and_then(|v| v.parse().ok())
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_WORKER_COUNT),
    }
}
