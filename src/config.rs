use serde::Deserialize;
use std::path::PathBuf;

/// Client-side configuration, loaded from TOML. Everything has a default so
/// an empty file (or no file) works out of the box against a local backend.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Base URL of the import backend, including the API prefix.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Seconds between status polls while an import task is running.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Per-request timeout for all backend calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_api_base() -> String {
    "http://127.0.0.1:8000/api/v1".into()
}
fn default_poll_interval() -> u64 {
    2
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_dir() -> PathBuf {
    "./logs".into()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            log_dir: default_log_dir(),
        }
    }
}

impl ClientConfig {
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: ClientConfig = toml::from_str(&s)?;
        Ok(cfg)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}
