//! CLI command implementations

pub mod browse;
pub mod config;
pub mod container;
pub mod hosts;
pub mod resources;
pub mod status;
pub mod test_host;
pub mod use_host;

pub use browse::execute as browse;
pub use config::execute as config;
pub use container::execute as container;
pub use hosts::execute as hosts;
pub use resources::execute as resources;
pub use status::execute as status;
pub use test_host::execute as test_host;
pub use use_host::execute as use_host;

use crate::api::ApiClient;
use crate::cache::{CacheOptions, DiagnosticSink, FetchReport, ResourceCache};
use crate::config::Config;
use crate::error::RubickResult;
use crate::hosts::{CurrentHostStore, HostDirectory};
use crate::resource::HostId;
use crate::ui::{self, Level, UiContext};
use std::sync::Arc;

/// Host list from the backend with the saved selection applied
pub(crate) async fn load_directory(client: &ApiClient) -> RubickResult<HostDirectory> {
    let saved = CurrentHostStore::new().load().await?;
    HostDirectory::load(client, saved).await
}

/// Resource cache over the backend client
pub(crate) fn build_cache(
    client: Arc<ApiClient>,
    config: &Config,
    sink: Arc<dyn DiagnosticSink>,
) -> ResourceCache {
    ResourceCache::with_sink(client, sink, CacheOptions::from(&config.cache))
}

/// Prints partial load failures as warning lines
pub(crate) struct ConsoleSink {
    ctx: UiContext,
}

impl ConsoleSink {
    pub(crate) fn new(ctx: UiContext) -> Self {
        Self { ctx }
    }
}

impl DiagnosticSink for ConsoleSink {
    fn fetch_failed(&self, host: &HostId, report: &FetchReport) {
        ui::line_with_hint(
            &self.ctx,
            Level::Warn,
            &format!("{}: could not refresh {}", host, report.failed_label()),
            "showing previous data",
        );
        for failure in &report.failures {
            tracing::debug!(host = %host, kind = %failure.kind, "{}", failure.error);
        }
    }
}
