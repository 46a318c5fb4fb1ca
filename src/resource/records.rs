//! Typed listing records as returned by the backend
//!
//! Field names mirror the backend's JSON. Every struct defaults missing
//! fields so that older backends still decode.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Common view over a record of any kind, used for rendering and selection
pub trait ResourceRecord {
    /// Stable identifier within the host
    fn id(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;

    /// One-line summary for tree and table output
    fn summary(&self) -> String;
}

/// Container listing entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub image: String,
    pub state: String,
    pub status: String,
    pub created: i64,
    pub ports: Vec<PortMapping>,
    pub labels: HashMap<String, String>,
    pub mounts: Vec<MountInfo>,
    pub networks: Vec<NetworkAttachment>,
}

/// Published container port
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortMapping {
    pub ip: String,
    pub private_port: u16,
    pub public_port: u16,
    #[serde(rename = "type")]
    pub protocol: String,
}

/// Container mount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub destination: String,
    pub mode: String,
    pub rw: bool,
}

/// Network a container is attached to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkAttachment {
    pub name: String,
    pub network_id: String,
    pub ip_address: String,
    pub mac_address: String,
    pub gateway: String,
}

impl Container {
    /// Whether the container is currently running
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

impl ResourceRecord for Container {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{} [{}] {}", self.image, self.state, self.status)
    }
}

/// Image listing entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub id: String,
    pub repo_tags: Vec<String>,
    pub size: u64,
    pub created: i64,
    pub labels: HashMap<String, String>,
}

impl Image {
    /// Short image id without the digest algorithm prefix
    pub fn short_id(&self) -> &str {
        let id = self.id.strip_prefix("sha256:").unwrap_or(&self.id);
        &id[..id.len().min(12)]
    }
}

impl ResourceRecord for Image {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.repo_tags
            .first()
            .map(String::as_str)
            .unwrap_or_else(|| self.short_id())
    }

    fn summary(&self) -> String {
        format!("{} {}", self.short_id(), format_bytes(self.size))
    }
}

/// Volume listing entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volume {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
    pub created_at: String,
    pub labels: HashMap<String, String>,
    pub scope: String,
    pub options: HashMap<String, String>,
    pub usage_data: Option<VolumeUsage>,
}

/// Disk usage reported for a volume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeUsage {
    pub size: i64,
    pub ref_count: i64,
}

impl ResourceRecord for Volume {
    fn id(&self) -> &str {
        &self.name
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{} ({})", self.driver, self.scope)
    }
}

/// Network listing entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub scope: String,
    pub ipam: Ipam,
    pub created: String,
    pub labels: HashMap<String, String>,
    pub internal: bool,
    pub attachable: bool,
    pub ingress: bool,
    pub enable_ipv6: bool,
}

/// IP address management settings of a network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ipam {
    pub driver: String,
    pub config: Vec<IpamPool>,
}

/// One address pool of a network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpamPool {
    pub subnet: String,
    pub gateway: Option<String>,
}

impl ResourceRecord for Network {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        let subnets: Vec<&str> = self.ipam.config.iter().map(|p| p.subnet.as_str()).collect();
        if subnets.is_empty() {
            self.driver.clone()
        } else {
            format!("{} {}", self.driver, subnets.join(","))
        }
    }
}

/// Compose project listing entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeProject {
    pub id: String,
    pub name: String,
    pub host_id: String,
    /// "content" (inline compose file) or "directory"
    pub source_type: String,
    pub content: String,
    pub work_dir: String,
    pub compose_file: String,
    pub env_file: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ResourceRecord for ComposeProject {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        if self.work_dir.is_empty() {
            format!("[{}]", self.status)
        } else {
            format!("[{}] {}", self.status, self.work_dir)
        }
    }
}

/// Point-in-time usage of a running container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerStats {
    pub cpu_percent: f64,
    pub memory_usage: u64,
    pub memory_limit: u64,
    pub memory_percent: f64,
    pub network_rx: u64,
    pub network_tx: u64,
    pub block_read: u64,
    pub block_write: u64,
}

impl ContainerStats {
    /// `(label, value)` rows for display
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("CPU", format!("{:.1}%", self.cpu_percent)),
            (
                "Memory",
                format!(
                    "{} / {} ({:.1}%)",
                    format_bytes(self.memory_usage),
                    format_bytes(self.memory_limit),
                    self.memory_percent
                ),
            ),
            (
                "Network",
                format!(
                    "rx {} / tx {}",
                    format_bytes(self.network_rx),
                    format_bytes(self.network_tx)
                ),
            ),
            (
                "Block I/O",
                format!(
                    "read {} / write {}",
                    format_bytes(self.block_read),
                    format_bytes(self.block_write)
                ),
            ),
        ]
    }
}

/// Format bytes as human-readable size (e.g., "1.5 GB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
