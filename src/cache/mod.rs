//! In-memory cache of per-host resource listings
//!
//! One entry per host holds the five listings (containers, images, volumes,
//! networks, compose projects). Entries are filled by a single fan-out over
//! an injected `ResourceFetcher` and can be refreshed or evicted at any time.
//!
//! # Entry States
//!
//! | State | Meaning | `load` does |
//! |-------|---------|-------------|
//! | Empty | never fetched | starts a fetch |
//! | Loading | fetch in flight | waits for it |
//! | Loaded | results applied | nothing |
//!
//! Individual listing failures never fail a load: the failing kinds keep
//! their previous records and a single diagnostic is emitted.

mod diagnostics;
mod entry;
mod fetch;
mod manager;
#[cfg(test)]
pub(crate) mod testing;

pub use diagnostics::{DiagnosticSink, LogSink};
pub use entry::{CacheEntry, EntryState, LoadOutcome};
pub use fetch::{FetchReport, KindFailure, ResourceFetcher};
pub use manager::{CacheOptions, ResourceCache};
