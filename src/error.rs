//! Error types for Rubick
//!
//! All modules use `RubickResult<T>` as their return type. Failures of a
//! single backend request are `TransportError`, which the resource cache
//! absorbs instead of propagating.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Rubick operations
pub type RubickResult<T> = Result<T, RubickError>;

/// A failed request against the backend API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("{url} returned HTTP {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Request task failed: {0}")]
    Task(String),
}

impl TransportError {
    /// Whether the backend could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Request { .. })
    }
}

/// All errors that can occur in Rubick
#[derive(Error, Debug)]
pub enum RubickError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file already exists: {0}")]
    ConfigExists(PathBuf),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Host errors
    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("No hosts registered on the backend")]
    NoHosts,

    #[error("Backend cannot reach host {host}: {message}")]
    HostCheckFailed { host: String, message: String },

    // Container errors
    #[error("No container matching '{query}' on {host}")]
    ContainerNotFound { host: String, query: String },

    #[error("'{query}' matches {count} containers on {host}")]
    AmbiguousContainer {
        host: String,
        query: String,
        count: usize,
    },

    // Backend errors
    #[error("Backend request failed: {0}")]
    Transport(#[from] TransportError),

    // Terminal errors
    #[error("{0} requires an interactive terminal")]
    NotInteractive(&'static str),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RubickError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Transport(e) if e.is_unreachable() => {
                Some("Check that the backend is running, or pass --api-url")
            }
            Self::NoHosts => Some("Register a host in the web console first"),
            Self::HostNotFound(_) => Some("Run: rubick hosts"),
            Self::HostCheckFailed { .. } => Some("Check the host's Docker endpoint in the web console"),
            Self::ContainerNotFound { .. } => Some("Run: rubick resources --kind containers"),
            Self::AmbiguousContainer { .. } => Some("Use the full container id or its name"),
            Self::ConfigExists(_) => Some("Use --force to overwrite"),
            Self::NotInteractive(_) => Some("Pass the value as an argument instead"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RubickError::HostNotFound("h1".to_string());
        assert!(err.to_string().contains("Host not found: h1"));
    }

    #[test]
    fn transport_error_converts() {
        let err: RubickError = TransportError::Api {
            code: 1002,
            message: "connection failed".to_string(),
        }
        .into();
        assert!(err.to_string().contains("API error 1002"));
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn unreachable_backend_has_hint() {
        let err: RubickError = TransportError::Request {
            url: "http://127.0.0.1:8080/api/v1/hosts".to_string(),
            reason: "connection refused".to_string(),
        }
        .into();
        assert!(err.hint().unwrap().contains("--api-url"));
    }
}
