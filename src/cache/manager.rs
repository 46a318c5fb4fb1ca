//! Per-host resource cache
//!
//! Every host has at most one fetch in flight. Each fetch is stamped with a
//! generation drawn from a cache-wide counter; results are merged only if
//! the entry still carries that generation when the fetch completes, so a
//! refresh, eviction or reset that happened in the meantime silently wins.

use crate::cache::diagnostics::{DiagnosticSink, LogSink};
use crate::cache::entry::{CacheEntry, EntryState, LoadOutcome};
use crate::cache::fetch::{fan_out, FanOut, FetchReport, ResourceFetcher};
use crate::config::schema::CacheConfig;
use crate::resource::{HostId, HostResources};
use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::task::AbortHandle;
use tracing::{debug, error, trace};

type Completion = Shared<BoxFuture<'static, LoadOutcome>>;

/// Tunables for `ResourceCache`
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Abort superseded fetch tasks instead of letting them run out
    pub abort_superseded: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            abort_superseded: true,
        }
    }
}

impl From<&CacheConfig> for CacheOptions {
    fn from(config: &CacheConfig) -> Self {
        Self {
            abort_superseded: config.abort_superseded,
        }
    }
}

enum SlotState {
    Empty,
    Loading {
        completion: Completion,
        task: AbortHandle,
    },
    /// Keeps the completion of the fetch that loaded the slot so that
    /// callers overtaken by it can pick up its outcome
    Loaded { completion: Completion },
}

struct Slot {
    /// Distinguishes a slot from one re-created after eviction
    incarnation: u64,
    generation: u64,
    state: SlotState,
    resources: HostResources,
    loaded_at: Option<DateTime<Utc>>,
}

impl Slot {
    fn empty(incarnation: u64) -> Self {
        Self {
            incarnation,
            generation: 0,
            state: SlotState::Empty,
            resources: HostResources::default(),
            loaded_at: None,
        }
    }

    fn snapshot(&self, host: &HostId) -> CacheEntry {
        let state = match self.state {
            SlotState::Empty => EntryState::Empty,
            SlotState::Loading { .. } => EntryState::Loading,
            SlotState::Loaded { .. } => EntryState::Loaded,
        };
        CacheEntry {
            host: host.clone(),
            state,
            generation: self.generation,
            resources: self.resources.clone(),
            loaded_at: self.loaded_at,
        }
    }
}

/// Cache of resource listings keyed by host
///
/// Cloning is cheap and every clone shares the same entries.
#[derive(Clone)]
pub struct ResourceCache {
    inner: Arc<Inner>,
}

struct Inner {
    fetcher: Arc<dyn ResourceFetcher>,
    sink: Arc<dyn DiagnosticSink>,
    options: CacheOptions,
    entries: Mutex<HashMap<HostId, Slot>>,
    generations: AtomicU64,
    incarnations: AtomicU64,
}

impl ResourceCache {
    /// Create a cache that logs partial failures
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self::with_sink(fetcher, Arc::new(LogSink), CacheOptions::default())
    }

    /// Create a cache with a custom diagnostics sink and options
    pub fn with_sink(
        fetcher: Arc<dyn ResourceFetcher>,
        sink: Arc<dyn DiagnosticSink>,
        options: CacheOptions,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                sink,
                options,
                entries: Mutex::new(HashMap::new()),
                generations: AtomicU64::new(0),
                incarnations: AtomicU64::new(0),
            }),
        }
    }

    /// Make sure the host's resources are loaded.
    ///
    /// Starts a fetch only when the entry is empty. A call made while a fetch
    /// is in flight waits for that fetch; a call on a loaded entry returns
    /// `Cached` immediately. If a refresh overtakes the awaited fetch, the
    /// call follows the newer fetch and only returns `Superseded` once the
    /// entry has been evicted or cleared.
    pub async fn load(&self, host: &HostId) -> LoadOutcome {
        let (incarnation, pending) = {
            let mut entries = self.inner.lock_entries();
            let slot = entries
                .entry(host.clone())
                .or_insert_with(|| self.inner.new_slot());
            let pending = match slot.state {
                SlotState::Loaded { .. } => {
                    trace!(host = %host, "Resources already loaded");
                    return LoadOutcome::Cached;
                }
                SlotState::Loading { ref completion, .. } => {
                    trace!(host = %host, generation = slot.generation, "Joining in-flight fetch");
                    completion.clone()
                }
                SlotState::Empty => Inner::start_fetch(&self.inner, host, slot),
            };
            (slot.incarnation, pending)
        };
        self.settle(host, incarnation, pending).await
    }

    /// Fetch the host's resources again, superseding any fetch in flight.
    ///
    /// Records stay visible while the new fetch runs; kinds that fail keep
    /// their previous records.
    pub async fn refresh(&self, host: &HostId) -> LoadOutcome {
        let (incarnation, pending) = {
            let mut entries = self.inner.lock_entries();
            let slot = entries
                .entry(host.clone())
                .or_insert_with(|| self.inner.new_slot());
            self.inner.supersede(host, slot);
            (slot.incarnation, Inner::start_fetch(&self.inner, host, slot))
        };
        self.settle(host, incarnation, pending).await
    }

    /// Await `pending`, following whichever fetch replaced it as long as the
    /// slot it belonged to is still in the map
    async fn settle(&self, host: &HostId, incarnation: u64, mut pending: Completion) -> LoadOutcome {
        loop {
            let outcome = pending.await;
            if outcome != LoadOutcome::Superseded {
                return outcome;
            }

            pending = {
                let entries = self.inner.lock_entries();
                match entries.get(host) {
                    Some(slot) if slot.incarnation == incarnation => match slot.state {
                        SlotState::Loading { ref completion, .. }
                        | SlotState::Loaded { ref completion } => {
                            trace!(host = %host, generation = slot.generation, "Following newer fetch");
                            completion.clone()
                        }
                        SlotState::Empty => return LoadOutcome::Superseded,
                    },
                    _ => return LoadOutcome::Superseded,
                }
            };
        }
    }

    /// Drop the host's entry. A fetch in flight for it will not resurrect it.
    pub fn evict(&self, host: &HostId) {
        let removed = self.inner.lock_entries().remove(host);
        if let Some(mut slot) = removed {
            self.inner.supersede(host, &mut slot);
            debug!(host = %host, "Evicted cached resources");
        }
    }

    /// Snapshot of the host's entry; never starts a fetch
    pub fn get(&self, host: &HostId) -> Option<CacheEntry> {
        self.inner
            .lock_entries()
            .get(host)
            .map(|slot| slot.snapshot(host))
    }

    /// Drop every entry
    pub fn clear_all(&self) {
        let drained: Vec<(HostId, Slot)> = self.inner.lock_entries().drain().collect();
        let count = drained.len();
        for (host, mut slot) in drained {
            self.inner.supersede(&host, &mut slot);
        }
        debug!("Cleared {} cached host(s)", count);
    }

    /// Hosts that currently have an entry, sorted
    pub fn hosts(&self) -> Vec<HostId> {
        let mut hosts: Vec<HostId> = self.inner.lock_entries().keys().cloned().collect();
        hosts.sort();
        hosts
    }

    pub fn len(&self) -> usize {
        self.inner.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Inner {
    fn new_slot(&self) -> Slot {
        Slot::empty(self.incarnations.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<HostId, Slot>> {
        // Slots are only mutated by short non-panicking sections.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the slot into `Loading` under a fresh generation and spawn the
    /// fan-out. Must be called with the entries lock held.
    fn start_fetch(self: &Arc<Self>, host: &HostId, slot: &mut Slot) -> Completion {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        slot.generation = generation;

        let task = tokio::spawn(Arc::clone(self).run_fetch(host.clone(), generation));
        let abort = task.abort_handle();

        let weak: Weak<Inner> = Arc::downgrade(self);
        let task_host = host.clone();
        let completion = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(err) if err.is_cancelled() => LoadOutcome::Superseded,
                Err(err) => {
                    error!(host = %task_host, generation, "Resource fetch task failed: {}", err);
                    if let Some(inner) = weak.upgrade() {
                        inner.release(&task_host, generation);
                    }
                    LoadOutcome::Abandoned
                }
            }
        }
        .boxed()
        .shared();

        slot.state = SlotState::Loading {
            completion: completion.clone(),
            task: abort,
        };
        debug!(host = %host, generation, "Fetching host resources");
        completion
    }

    async fn run_fetch(self: Arc<Self>, host: HostId, generation: u64) -> LoadOutcome {
        let fetched = fan_out(self.fetcher.as_ref(), &host).await;

        let Some(report) = self.apply(&host, generation, fetched) else {
            debug!(host = %host, generation, "Discarding superseded fetch results");
            return LoadOutcome::Superseded;
        };

        if report.is_clean() {
            debug!(host = %host, generation, "Host resources loaded");
        } else {
            self.sink.fetch_failed(&host, &report);
        }
        LoadOutcome::Applied(report)
    }

    /// Merge results if the entry still belongs to `generation`
    fn apply(&self, host: &HostId, generation: u64, fetched: FanOut) -> Option<FetchReport> {
        let mut entries = self.lock_entries();
        let slot = entries.get_mut(host)?;
        if slot.generation != generation || !matches!(slot.state, SlotState::Loading { .. }) {
            return None;
        }

        let report = fetched.apply_to(&mut slot.resources);
        if let SlotState::Loading { completion, .. } =
            mem::replace(&mut slot.state, SlotState::Empty)
        {
            slot.state = SlotState::Loaded { completion };
        }
        slot.loaded_at = Some(Utc::now());
        Some(report)
    }

    /// Return a slot whose fetch task died to `Empty`
    fn release(&self, host: &HostId, generation: u64) {
        let mut entries = self.lock_entries();
        if let Some(slot) = entries.get_mut(host) {
            if slot.generation == generation && matches!(slot.state, SlotState::Loading { .. }) {
                slot.state = SlotState::Empty;
            }
        }
    }

    /// Reset the slot to `Empty`, giving up on any fetch in flight
    fn supersede(&self, host: &HostId, slot: &mut Slot) {
        if let SlotState::Loading { task, .. } = mem::replace(&mut slot.state, SlotState::Empty) {
            debug!(host = %host, generation = slot.generation, "Superseding in-flight fetch");
            if self.options.abort_superseded {
                task.abort();
            }
        }
    }
}
