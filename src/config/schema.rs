//! Config file layout
//!
//! Every section and field is optional; anything left out takes its
//! default.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Backend API settings
    pub api: ApiConfig,

    /// Resource cache settings
    pub cache: CacheConfig,
}

impl Config {
    /// Reject values serde accepts but the client cannot use
    pub fn validate(&self) -> Result<(), String> {
        let url = self.api.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!(
                "api.base_url must start with http:// or https://, got {:?}",
                url
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err("api.timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Shape of log lines on stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_format: LogFormat,
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL including the API prefix
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Resource cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Abort the background task of a fetch once a refresh or eviction
    /// supersedes it (its results are discarded either way)
    pub abort_superseded: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            abort_superseded: true,
        }
    }
}
