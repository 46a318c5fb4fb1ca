//! Selection and expansion state of the resource tree
//!
//! Expanding a host loads its resources through the cache, collapsing it
//! evicts them. Group expansion and selection are pure view state.

use crate::cache::{CacheEntry, LoadOutcome, ResourceCache};
use crate::resource::{HostId, ResourceKind};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// What a selection points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Host,
    Resource(ResourceKind),
}

/// The single active item of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub host_id: HostId,
    pub kind: SelectionKind,
    pub id: String,
    pub name: String,
}

impl Selection {
    pub fn host(host_id: HostId, name: impl Into<String>) -> Self {
        Self {
            id: host_id.to_string(),
            host_id,
            kind: SelectionKind::Host,
            name: name.into(),
        }
    }

    pub fn resource(
        host_id: HostId,
        kind: ResourceKind,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            host_id,
            kind: SelectionKind::Resource(kind),
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Identifies a resource group under a host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub host: HostId,
    pub kind: ResourceKind,
}

impl GroupKey {
    pub fn new(host: HostId, kind: ResourceKind) -> Self {
        Self { host, kind }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.kind.key())
    }
}

/// Result of toggling a host node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostToggle {
    Expanded(LoadOutcome),
    Collapsed,
}

/// Tree view state driving the resource cache
pub struct ResourceTracker {
    cache: ResourceCache,
    selection: Option<Selection>,
    expanded_hosts: HashSet<HostId>,
    expanded_groups: HashSet<GroupKey>,
}

impl ResourceTracker {
    pub fn new(cache: ResourceCache) -> Self {
        Self {
            cache,
            selection: None,
            expanded_hosts: HashSet::new(),
            expanded_groups: HashSet::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Host of the current selection
    pub fn selected_host_id(&self) -> Option<&HostId> {
        self.selection.as_ref().map(|s| &s.host_id)
    }

    /// Expand (and load) or collapse (and evict) a host
    pub async fn toggle_host_expand(&mut self, host: &HostId) -> HostToggle {
        if self.expanded_hosts.remove(host) {
            self.cache.evict(host);
            HostToggle::Collapsed
        } else {
            self.expanded_hosts.insert(host.clone());
            HostToggle::Expanded(self.cache.load(host).await)
        }
    }

    /// Flip a group's expansion; returns whether it is now expanded
    pub fn toggle_group_expand(&mut self, key: GroupKey) -> bool {
        if self.expanded_groups.remove(&key) {
            false
        } else {
            self.expanded_groups.insert(key);
            true
        }
    }

    pub fn is_host_expanded(&self, host: &HostId) -> bool {
        self.expanded_hosts.contains(host)
    }

    pub fn is_group_expanded(&self, key: &GroupKey) -> bool {
        self.expanded_groups.contains(key)
    }

    /// Cached resources of a host, if any
    pub fn host_cache(&self, host: &HostId) -> Option<CacheEntry> {
        self.cache.get(host)
    }

    pub async fn refresh_host(&self, host: &HostId) -> LoadOutcome {
        self.cache.refresh(host).await
    }

    /// Drop all cached data and reset the view
    pub fn clear_all(&mut self) {
        self.cache.clear_all();
        self.expanded_hosts.clear();
        self.expanded_groups.clear();
        self.selection = None;
    }
}
