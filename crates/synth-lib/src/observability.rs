//! Structured logging for engine consumers
//!
//! The engine itself only emits `debug!`/`trace!` events. Callers that
//! batch work (series generation, fleet alert feeds) report through
//! [`StructuredLogger`] so every event carries the same fields.

use tracing::{info, warn};

use crate::alerts::{Alert, AlertSeverity};
use crate::catalog::Catalog;
use crate::models::MetricType;

/// Structured logger for generator events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    source: String,
}

impl StructuredLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Log a successfully validated catalog
    pub fn log_catalog_loaded(&self, catalog: &Catalog) {
        info!(
            event = "catalog_loaded",
            source = %self.source,
            profiles = catalog.profiles().count(),
            scenarios = catalog.scenarios().len(),
            servers = catalog.servers().len(),
            "Scenario catalog validated"
        );
    }

    /// Log a generated series
    pub fn log_series_generated(
        &self,
        server_id: &str,
        metric: MetricType,
        start: u64,
        end: u64,
        samples: usize,
    ) {
        info!(
            event = "series_generated",
            source = %self.source,
            server_id = %server_id,
            metric = %metric,
            start_ms = start,
            end_ms = end,
            samples = samples,
            "Generated metric series"
        );
    }

    /// Log a raised alert; critical alerts go out at warn level
    pub fn log_alert(&self, alert: &Alert) {
        match alert.severity {
            AlertSeverity::Critical => {
                warn!(
                    event = "alert_raised",
                    source = %self.source,
                    server_id = %alert.server_id,
                    server_type = %alert.server_type,
                    scenario = %alert.scenario,
                    phase = %alert.phase,
                    severity = %alert.severity,
                    timestamp_ms = alert.timestamp,
                    "Critical synthetic alert"
                );
            }
            _ => {
                info!(
                    event = "alert_raised",
                    source = %self.source,
                    server_id = %alert.server_id,
                    server_type = %alert.server_type,
                    scenario = %alert.scenario,
                    phase = %alert.phase,
                    severity = %alert.severity,
                    timestamp_ms = alert.timestamp,
                    "Synthetic alert"
                );
            }
        }
    }

    /// Log a rejected request
    pub fn log_rejected(&self, operation: &str, reason: &str) {
        warn!(
            event = "request_rejected",
            source = %self.source,
            operation = %operation,
            reason = %reason,
            "Rejected invalid request"
        );
    }
}
