//! Host identity, resource kinds, and the per-host resource set

pub mod records;

pub use records::{
    format_bytes, ComposeProject, Container, ContainerStats, Image, Network, ResourceRecord, Volume,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Identifier of a host registered on the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(String);

impl HostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HostId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for HostId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The listing categories cached per host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Container,
    Image,
    Volume,
    Network,
    ComposeProject,
}

impl ResourceKind {
    /// All kinds in display order
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Container,
        ResourceKind::Image,
        ResourceKind::Volume,
        ResourceKind::Network,
        ResourceKind::ComposeProject,
    ];

    /// Plural label used for groups and diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Container => "containers",
            Self::Image => "images",
            Self::Volume => "volumes",
            Self::Network => "networks",
            Self::ComposeProject => "compose projects",
        }
    }

    /// Short key used in group identifiers
    pub fn key(&self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Image => "image",
            Self::Volume => "volume",
            Self::Network => "network",
            Self::ComposeProject => "compose",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "container" | "containers" => Ok(Self::Container),
            "image" | "images" => Ok(Self::Image),
            "volume" | "volumes" => Ok(Self::Volume),
            "network" | "networks" => Ok(Self::Network),
            "compose" | "project" | "projects" | "compose-project" | "compose-projects" => {
                Ok(Self::ComposeProject)
            }
            other => Err(format!(
                "unknown resource kind '{other}' (expected containers, images, volumes, networks or compose)"
            )),
        }
    }
}

/// Everything cached for one host, one sequence per kind
///
/// Each sequence sits behind its own `Arc` and is replaced as a whole, so a
/// snapshot taken by a reader never changes underneath it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HostResources {
    pub containers: Arc<Vec<Container>>,
    pub images: Arc<Vec<Image>>,
    pub volumes: Arc<Vec<Volume>>,
    pub networks: Arc<Vec<Network>>,
    pub compose_projects: Arc<Vec<ComposeProject>>,
}

impl HostResources {
    /// Number of records of the given kind
    pub fn count(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Container => self.containers.len(),
            ResourceKind::Image => self.images.len(),
            ResourceKind::Volume => self.volumes.len(),
            ResourceKind::Network => self.networks.len(),
            ResourceKind::ComposeProject => self.compose_projects.len(),
        }
    }

    /// Records of the given kind behind the common record view
    pub fn records(&self, kind: ResourceKind) -> Vec<&dyn ResourceRecord> {
        fn erase<T: ResourceRecord>(items: &[T]) -> Vec<&dyn ResourceRecord> {
            items.iter().map(|r| r as &dyn ResourceRecord).collect()
        }

        match kind {
            ResourceKind::Container => erase(&self.containers),
            ResourceKind::Image => erase(&self.images),
            ResourceKind::Volume => erase(&self.volumes),
            ResourceKind::Network => erase(&self.networks),
            ResourceKind::ComposeProject => erase(&self.compose_projects),
        }
    }

    pub fn is_empty(&self) -> bool {
        ResourceKind::ALL.iter().all(|k| self.count(*k) == 0)
    }
}
