//! Where rubick keeps its files, and how the config file is read
//!
//! The config file lives at `<config_dir>/rubick/config.toml` unless
//! `--config` or `RUBICK_CONFIG` names another one. Mutable state (the
//! current host) lives under the platform state directory.

pub mod schema;

pub use schema::{ApiConfig, CacheConfig, Config, GeneralConfig, LogFormat};

use crate::error::{RubickError, RubickResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// The config file in use for this invocation
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// The explicitly named file, else the per-user default
    pub fn locate(explicit: Option<PathBuf>) -> Self {
        let path = explicit.unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rubick")
                .join("config.toml")
        });
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse and validate the file; a missing file means defaults
    pub async fn read(&self) -> RubickResult<Config> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.path.display());
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(RubickError::io(
                    format!("reading config from {}", self.path.display()),
                    e,
                ))
            }
        };

        let config: Config = toml::from_str(&content).map_err(|e| self.invalid(e.to_string()))?;
        config.validate().map_err(|reason| self.invalid(reason))?;
        Ok(config)
    }

    /// Write a default config, refusing to replace one unless `force`
    pub async fn write_default(&self, force: bool) -> RubickResult<()> {
        if !force && fs::try_exists(&self.path).await.unwrap_or(false) {
            return Err(RubickError::ConfigExists(self.path.clone()));
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RubickError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = toml::to_string_pretty(&Config::default())?;
        fs::write(&self.path, content).await.map_err(|e| {
            RubickError::io(format!("writing config to {}", self.path.display()), e)
        })?;

        info!("Wrote default config to {}", self.path.display());
        Ok(())
    }

    fn invalid(&self, reason: String) -> RubickError {
        RubickError::ConfigInvalid {
            path: self.path.clone(),
            reason,
        }
    }
}

/// Directory for state that outlives one invocation
pub fn state_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rubick")
}

/// File remembering the current host
pub fn current_host_path() -> PathBuf {
    state_dir().join("current_host")
}

/// Create the state directory if needed
pub async fn ensure_state_dir() -> RubickResult<()> {
    let dir = state_dir();
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| RubickError::io(format!("creating directory {}", dir.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_in(temp: &TempDir) -> ConfigFile {
        ConfigFile::locate(Some(temp.path().join("nested").join("config.toml")))
    }

    #[tokio::test]
    async fn missing_file_reads_as_defaults() {
        let temp = TempDir::new().unwrap();
        let config = file_in(&temp).read().await.unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080/api/v1");
        assert!(config.cache.abort_superseded);
    }

    #[tokio::test]
    async fn default_file_is_written_once() {
        let temp = TempDir::new().unwrap();
        let file = file_in(&temp);

        file.write_default(false).await.unwrap();
        assert!(file.path().exists());
        let err = file.write_default(false).await.unwrap_err();
        assert!(matches!(err, RubickError::ConfigExists(_)));

        file.write_default(true).await.unwrap();
        assert_eq!(file.read().await.unwrap().api.timeout_secs, 30);
    }

    #[tokio::test]
    async fn syntax_error_names_the_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "[api\nbase_url = 1").await.unwrap();

        let err = ConfigFile::locate(Some(path.clone())).read().await.unwrap_err();
        match err {
            RubickError::ConfigInvalid { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn zero_timeout_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "[api]\ntimeout_secs = 0\n").await.unwrap();

        let err = ConfigFile::locate(Some(path)).read().await.unwrap_err();
        match err {
            RubickError::ConfigInvalid { reason, .. } => assert!(reason.contains("timeout_secs")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn current_host_lives_in_state_dir() {
        assert!(current_host_path().starts_with(state_dir()));
    }
}
