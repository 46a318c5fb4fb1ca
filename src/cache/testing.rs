//! Scripted collaborators for cache tests

use crate::cache::diagnostics::DiagnosticSink;
use crate::cache::fetch::{FetchReport, ResourceFetcher};
use crate::error::TransportError;
use crate::resource::{
    ComposeProject, Container, HostId, Image, Network, ResourceKind, Volume,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fetcher returning one record per kind named after the call round
///
/// The n-th call for a (host, kind) pair is round n. Records are named
/// `round-<n>` so tests can tell which fetch produced the data.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    calls: Mutex<HashMap<(HostId, ResourceKind), usize>>,
    completed: Mutex<HashMap<(HostId, ResourceKind), usize>>,
    failing: Mutex<HashSet<ResourceKind>>,
    delays: Mutex<HashMap<usize, Duration>>,
    panic_round: Mutex<Option<usize>>,
    empty: AtomicBool,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Calls started for the pair
    pub(crate) fn calls(&self, host: &HostId, kind: ResourceKind) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.get(&(host.clone(), kind)).copied().unwrap_or(0)
    }

    /// Calls that ran to completion for the pair
    pub(crate) fn completed(&self, host: &HostId, kind: ResourceKind) -> usize {
        let completed = self.completed.lock().unwrap();
        completed.get(&(host.clone(), kind)).copied().unwrap_or(0)
    }

    /// Calls started for the host across all kinds
    pub(crate) fn total_calls(&self, host: &HostId) -> usize {
        ResourceKind::ALL.iter().map(|k| self.calls(host, *k)).sum()
    }

    /// Make every later call for `kind` fail
    pub(crate) fn fail(&self, kind: ResourceKind) {
        self.failing.lock().unwrap().insert(kind);
    }

    /// Delay every call of the given round
    pub(crate) fn delay_round(&self, round: usize, delay: Duration) {
        self.delays.lock().unwrap().insert(round, delay);
    }

    /// Panic inside the container call of the given round
    pub(crate) fn panic_on_round(&self, round: usize) {
        *self.panic_round.lock().unwrap() = Some(round);
    }

    /// Return empty listings instead of one record per kind
    pub(crate) fn return_empty(&self) {
        self.empty.store(true, Ordering::SeqCst);
    }

    /// Run one scripted call; `Ok(Some(name))` asks for one record
    async fn call(&self, host: &HostId, kind: ResourceKind) -> Result<Option<String>, TransportError> {
        let round = {
            let mut calls = self.calls.lock().unwrap();
            let n = calls.entry((host.clone(), kind)).or_insert(0);
            *n += 1;
            *n
        };

        let delay = self.delays.lock().unwrap().get(&round).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let panic_round = *self.panic_round.lock().unwrap();
        if kind == ResourceKind::Container && panic_round == Some(round) {
            panic!("scripted fetcher panic");
        }

        *self
            .completed
            .lock()
            .unwrap()
            .entry((host.clone(), kind))
            .or_insert(0) += 1;

        if self.failing.lock().unwrap().contains(&kind) {
            return Err(TransportError::Status {
                url: format!("http://backend/api/v1/{}", kind.label()),
                status: 500,
                message: "docker daemon unavailable".to_string(),
            });
        }

        if self.empty.load(Ordering::SeqCst) {
            Ok(None)
        } else {
            Ok(Some(format!("round-{round}")))
        }
    }
}

#[async_trait]
impl ResourceFetcher for ScriptedFetcher {
    async fn containers(&self, host: &HostId) -> Result<Vec<Container>, TransportError> {
        let name = self.call(host, ResourceKind::Container).await?;
        Ok(name
            .map(|name| Container {
                id: format!("{host}-{name}"),
                name,
                state: "running".to_string(),
                ..Default::default()
            })
            .into_iter()
            .collect())
    }

    async fn images(&self, host: &HostId) -> Result<Vec<Image>, TransportError> {
        let name = self.call(host, ResourceKind::Image).await?;
        Ok(name
            .map(|name| Image {
                id: format!("sha256:{host}{name}"),
                repo_tags: vec![name],
                ..Default::default()
            })
            .into_iter()
            .collect())
    }

    async fn volumes(&self, host: &HostId) -> Result<Vec<Volume>, TransportError> {
        let name = self.call(host, ResourceKind::Volume).await?;
        Ok(name
            .map(|name| Volume {
                name,
                driver: "local".to_string(),
                ..Default::default()
            })
            .into_iter()
            .collect())
    }

    async fn networks(&self, host: &HostId) -> Result<Vec<Network>, TransportError> {
        let name = self.call(host, ResourceKind::Network).await?;
        Ok(name
            .map(|name| Network {
                id: format!("{host}-{name}"),
                name,
                driver: "bridge".to_string(),
                ..Default::default()
            })
            .into_iter()
            .collect())
    }

    async fn compose_projects(
        &self,
        host: &HostId,
    ) -> Result<Vec<ComposeProject>, TransportError> {
        let name = self.call(host, ResourceKind::ComposeProject).await?;
        Ok(name
            .map(|name| ComposeProject {
                id: format!("{host}-{name}"),
                name,
                host_id: host.to_string(),
                status: "running".to_string(),
                ..Default::default()
            })
            .into_iter()
            .collect())
    }
}

/// Sink remembering every notification
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<(HostId, Vec<ResourceKind>)>>,
}

impl RecordingSink {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn events(&self) -> Vec<(HostId, Vec<ResourceKind>)> {
        self.events.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn fetch_failed(&self, host: &HostId, report: &FetchReport) {
        self.events
            .lock()
            .unwrap()
            .push((host.clone(), report.failed_kinds()));
    }
}
