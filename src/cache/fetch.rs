//! Resource fetcher abstraction and the per-host fan-out

use crate::error::TransportError;
use crate::resource::{
    ComposeProject, Container, HostId, HostResources, Image, Network, ResourceKind, Volume,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of resource listings for a host
///
/// Implemented by the HTTP client in production and by scripted fakes in
/// tests. Each method is independent: the cache calls all five concurrently
/// and tolerates any subset failing.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn containers(&self, host: &HostId) -> Result<Vec<Container>, TransportError>;

    async fn images(&self, host: &HostId) -> Result<Vec<Image>, TransportError>;

    async fn volumes(&self, host: &HostId) -> Result<Vec<Volume>, TransportError>;

    async fn networks(&self, host: &HostId) -> Result<Vec<Network>, TransportError>;

    async fn compose_projects(&self, host: &HostId)
        -> Result<Vec<ComposeProject>, TransportError>;
}

/// A resource kind that could not be refreshed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindFailure {
    pub kind: ResourceKind,
    pub error: TransportError,
}

/// Per-kind result summary of one applied fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub failures: Vec<KindFailure>,
}

impl FetchReport {
    /// Whether every kind was refreshed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Kinds that kept their previous records
    pub fn failed_kinds(&self) -> Vec<ResourceKind> {
        self.failures.iter().map(|f| f.kind).collect()
    }

    /// Comma-separated labels of the failed kinds
    pub fn failed_label(&self) -> String {
        self.failures
            .iter()
            .map(|f| f.kind.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Raw results of the five listing calls for one host
pub(crate) struct FanOut {
    containers: Result<Vec<Container>, TransportError>,
    images: Result<Vec<Image>, TransportError>,
    volumes: Result<Vec<Volume>, TransportError>,
    networks: Result<Vec<Network>, TransportError>,
    compose_projects: Result<Vec<ComposeProject>, TransportError>,
}

impl FanOut {
    /// Replace every successfully fetched kind in `target`; failed kinds keep
    /// whatever they held before.
    pub(crate) fn apply_to(self, target: &mut HostResources) -> FetchReport {
        let mut report = FetchReport::default();
        merge(&mut target.containers, self.containers, ResourceKind::Container, &mut report);
        merge(&mut target.images, self.images, ResourceKind::Image, &mut report);
        merge(&mut target.volumes, self.volumes, ResourceKind::Volume, &mut report);
        merge(&mut target.networks, self.networks, ResourceKind::Network, &mut report);
        merge(
            &mut target.compose_projects,
            self.compose_projects,
            ResourceKind::ComposeProject,
            &mut report,
        );
        report
    }
}

fn merge<T>(
    slot: &mut Arc<Vec<T>>,
    result: Result<Vec<T>, TransportError>,
    kind: ResourceKind,
    report: &mut FetchReport,
) {
    match result {
        Ok(records) => *slot = Arc::new(records),
        Err(error) => report.failures.push(KindFailure { kind, error }),
    }
}

/// Run all five listing calls concurrently and wait for every one of them.
///
/// A failing call never cancels its siblings.
pub(crate) async fn fan_out(fetcher: &dyn ResourceFetcher, host: &HostId) -> FanOut {
    let (containers, images, volumes, networks, compose_projects) = tokio::join!(
        fetcher.containers(host),
        fetcher.images(host),
        fetcher.volumes(host),
        fetcher.networks(host),
        fetcher.compose_projects(host),
    );

    FanOut {
        containers,
        images,
        volumes,
        networks,
        compose_projects,
    }
}
