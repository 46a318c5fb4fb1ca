//! Cache entry snapshots and load outcomes

use crate::cache::fetch::{FetchReport, KindFailure};
use crate::resource::{HostId, HostResources};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle of a host's cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    /// Never fetched, or reset after a fetch task died
    Empty,
    /// A fetch is in flight
    Loading,
    /// The latest fetch finished (possibly with some kinds failing)
    Loaded,
}

/// Point-in-time copy of a host's cache entry
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    pub host: HostId,
    pub state: EntryState,
    /// Generation of the fetch that owns (or last owned) the entry
    pub generation: u64,
    pub resources: HostResources,
    /// When results were last applied
    pub loaded_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    pub fn is_loaded(&self) -> bool {
        self.state == EntryState::Loaded
    }

    pub fn is_loading(&self) -> bool {
        self.state == EntryState::Loading
    }
}

/// How a `load` or `refresh` call settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The entry was already loaded; nothing was fetched
    Cached,
    /// This generation's results were applied to the entry
    Applied(FetchReport),
    /// The entry was evicted or cleared before any fetch settled it. A call
    /// overtaken by a refresh follows the newer fetch instead.
    Superseded,
    /// The fetch task died before producing results; the entry went back
    /// to `Empty` so the next load retries
    Abandoned,
}

impl LoadOutcome {
    /// Kinds that failed in an applied fetch
    pub fn failures(&self) -> &[KindFailure] {
        match self {
            Self::Applied(report) => &report.failures,
            _ => &[],
        }
    }
}
