//! Persistence of the current host between invocations

use crate::config;
use crate::error::{RubickError, RubickResult};
use crate::resource::HostId;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// File holding the id of the current host
pub struct CurrentHostStore {
    path: PathBuf,
}

impl CurrentHostStore {
    /// Store in the default state directory
    pub fn new() -> Self {
        Self {
            path: config::current_host_path(),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the saved host, if any
    pub async fn load(&self) -> RubickResult<Option<HostId>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            RubickError::io(format!("reading current host from {}", self.path.display()), e)
        })?;

        let id = content.trim();
        if id.is_empty() {
            return Ok(None);
        }
        Ok(Some(HostId::new(id)))
    }

    /// Remember `host` as the current host
    pub async fn save(&self, host: &HostId) -> RubickResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RubickError::io("creating state directory", e))?;
        }

        fs::write(&self.path, format!("{}\n", host)).await.map_err(|e| {
            RubickError::io(format!("writing current host to {}", self.path.display()), e)
        })?;

        debug!("Saved current host {}", host);
        Ok(())
    }

    /// Forget the saved host
    pub async fn clear(&self) -> RubickResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).await.map_err(|e| {
                RubickError::io(format!("removing {}", self.path.display()), e)
            })?;
        }
        Ok(())
    }
}

impl Default for CurrentHostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_means_none() {
        let temp = TempDir::new().unwrap();
        let store = CurrentHostStore::with_path(temp.path().join("current_host"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_load_clear() {
        let temp = TempDir::new().unwrap();
        let store = CurrentHostStore::with_path(temp.path().join("state").join("current_host"));

        store.save(&HostId::new("h-42")).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(HostId::new("h-42")));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_file_means_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("current_host");
        tokio::fs::write(&path, "  \n").await.unwrap();

        let store = CurrentHostStore::with_path(path);
        assert!(store.load().await.unwrap().is_none());
    }
}
