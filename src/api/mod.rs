//! HTTP client for the backend REST API
//!
//! Every endpoint answers with an envelope `{ code, message, data }` where a
//! `code` of 0 (or 200) means success.

mod actions;
mod client;

pub use actions::{ContainerAction, HostCheck, ResourceActions};
pub use client::{ApiClient, HealthStatus};

#[cfg(test)]
pub(crate) use actions::testing::RecordingActions;
