//! Reporting of partially failed loads

use crate::cache::fetch::FetchReport;
use crate::resource::HostId;
use tracing::{debug, warn};

/// Receives one notification per applied load that had failing kinds
pub trait DiagnosticSink: Send + Sync {
    fn fetch_failed(&self, host: &HostId, report: &FetchReport);
}

/// Sink that writes failures to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn fetch_failed(&self, host: &HostId, report: &FetchReport) {
        warn!(
            host = %host,
            "Failed to refresh {} (showing previous data)",
            report.failed_label()
        );
        for failure in &report.failures {
            debug!(host = %host, kind = %failure.kind, "{}", failure.error);
        }
    }
}
