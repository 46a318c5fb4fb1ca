//! Write operations against the backend: container lifecycle and host checks

use crate::error::TransportError;
use crate::resource::{ContainerStats, HostId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle change requested for a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAction {
    Start,
    /// Seconds to wait before killing; backend default when `None`
    Stop { timeout: Option<u32> },
    Restart { timeout: Option<u32> },
    Remove { force: bool, volumes: bool },
}

impl ContainerAction {
    /// Verb for messages ("start", "stop", ...)
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop { .. } => "stop",
            Self::Restart { .. } => "restart",
            Self::Remove { .. } => "remove",
        }
    }

    /// Past tense for success messages
    pub fn done(&self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::Stop { .. } => "stopped",
            Self::Restart { .. } => "restarted",
            Self::Remove { .. } => "removed",
        }
    }

    /// Actions that make sense for a container in the given state
    pub fn available(running: bool) -> Vec<ContainerAction> {
        let mut actions = if running {
            vec![
                Self::Stop { timeout: None },
                Self::Restart { timeout: None },
            ]
        } else {
            vec![Self::Start]
        };
        actions.push(Self::Remove {
            force: running,
            volumes: false,
        });
        actions
    }
}

impl fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Body of `POST /hosts/{id}/test`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostCheck {
    pub success: bool,
    pub message: String,
    pub host: String,
}

/// Mutating calls the console issues on behalf of the user
///
/// Every successful container action changes what the listings would
/// return, so callers refresh the host's cache entry afterwards.
#[async_trait]
pub trait ResourceActions: Send + Sync {
    async fn container_action(
        &self,
        host: &HostId,
        container_id: &str,
        action: ContainerAction,
    ) -> Result<(), TransportError>;

    async fn container_stats(
        &self,
        host: &HostId,
        container_id: &str,
    ) -> Result<ContainerStats, TransportError>;

    async fn test_host(&self, host: &HostId) -> Result<HostCheck, TransportError>;
}
