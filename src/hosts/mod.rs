//! Registered hosts and the current-host selection

mod store;

pub use store::CurrentHostStore;

use crate::error::{RubickError, RubickResult, TransportError};
use crate::resource::HostId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the backend reaches a host's container runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostType {
    #[default]
    Local,
    Tcp,
    Ssh,
    #[serde(other)]
    Unknown,
}

impl HostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Tcp => "tcp",
            Self::Ssh => "ssh",
            Self::Unknown => "unknown",
        }
    }
}

/// A host registered on the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Host {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub host_type: HostType,
    /// Remote address; empty for local hosts
    pub host: String,
    pub is_default: bool,
    pub is_active: bool,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_port: Option<u16>,
}

impl Host {
    pub fn host_id(&self) -> HostId {
        HostId::new(self.id.clone())
    }

    /// Address shown next to the name
    pub fn endpoint(&self) -> String {
        match self.host_type {
            HostType::Local => "local socket".to_string(),
            HostType::Ssh => {
                let user = self.ssh_user.as_deref().unwrap_or("root");
                let port = self.ssh_port.unwrap_or(22);
                format!("ssh://{}@{}:{}", user, self.host, port)
            }
            HostType::Tcp => format!("tcp://{}:{}", self.host, self.docker_port.unwrap_or(2375)),
            HostType::Unknown => self.host.clone(),
        }
    }
}

/// Source of the registered host list
#[async_trait]
pub trait HostSource: Send + Sync {
    async fn hosts(&self) -> Result<Vec<Host>, TransportError>;
}

/// Loaded host list plus the host commands act on by default
#[derive(Debug, Clone)]
pub struct HostDirectory {
    hosts: Vec<Host>,
    current: Option<HostId>,
}

impl HostDirectory {
    /// Build a directory; an unknown or missing saved host falls back to the
    /// default host
    pub fn new(hosts: Vec<Host>, saved: Option<HostId>) -> Self {
        let mut dir = Self {
            hosts,
            current: None,
        };

        dir.current = match saved {
            Some(id) if dir.find(id.as_str()).is_some() => Some(id),
            Some(id) => {
                debug!("Saved host {} no longer exists, using default", id);
                dir.default_host().map(Host::host_id)
            }
            None => dir.default_host().map(Host::host_id),
        };
        dir
    }

    /// Fetch the host list from the backend
    pub async fn load(source: &dyn HostSource, saved: Option<HostId>) -> RubickResult<Self> {
        let hosts = source.hosts().await?;
        debug!("Loaded {} host(s)", hosts.len());
        Ok(Self::new(hosts, saved))
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// The host flagged as default, else the first one
    pub fn default_host(&self) -> Option<&Host> {
        self.hosts
            .iter()
            .find(|h| h.is_default)
            .or_else(|| self.hosts.first())
    }

    pub fn current_id(&self) -> Option<&HostId> {
        self.current.as_ref()
    }

    pub fn current_host(&self) -> Option<&Host> {
        self.current.as_ref().and_then(|id| self.find(id.as_str()))
    }

    /// Look a host up by id, then by name
    pub fn find(&self, key: &str) -> Option<&Host> {
        self.hosts
            .iter()
            .find(|h| h.id == key)
            .or_else(|| self.hosts.iter().find(|h| h.name == key))
    }

    /// Make `key` the current host
    pub fn set_current(&mut self, key: &str) -> RubickResult<&Host> {
        let id = self
            .find(key)
            .map(Host::host_id)
            .ok_or_else(|| RubickError::HostNotFound(key.to_string()))?;
        self.current = Some(id);
        self.current_host()
            .ok_or_else(|| RubickError::Internal("current host vanished".to_string()))
    }

    /// The host named by `key`, or the current host when `key` is `None`
    pub fn resolve(&self, key: Option<&str>) -> RubickResult<&Host> {
        match key {
            Some(key) => self
                .find(key)
                .ok_or_else(|| RubickError::HostNotFound(key.to_string())),
            None => self.current_host().ok_or(RubickError::NoHosts),
        }
    }
}
