//! Metrics engine facade
//!
//! Wires a validated catalog and config into per-server readings:
//! baseline for the 10-minute slot, cycle effect for the active scenario,
//! then minute jitter. The engine holds no mutable state, so a shared
//! reference can serve any number of threads.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use tracing::debug;

use crate::alerts::{generate_cycle_scenarios, Alert};
use crate::catalog::{Catalog, MetricRange};
use crate::composer::{baseline_value, generate_cycle_based_metric, Jitter};
use crate::config::EngineConfig;
use crate::cycle::{get_incident_cycle_info, CycleInfo};
use crate::error::{CatalogError, EngineError, Result};
use crate::models::{MetricSample, MetricType, ServerSnapshot, ServerType, TimestampMs};
use crate::time_bucket::{
    get_24_hour_cycle, get_baseline_10min_slot, normalize_timestamp, TimeOfDay, MINUTE_MS,
};

/// Upper bound on samples returned by a single series request
pub const MAX_SERIES_SAMPLES: u64 = 100_000;

const METRIC_COUNT: usize = MetricType::ALL.len();
const SERVER_TYPE_COUNT: usize = ServerType::ALL.len();

type RangeTable = [[MetricRange; METRIC_COUNT]; SERVER_TYPE_COUNT];

/// Deterministic synthetic metrics generator
#[derive(Debug, Clone)]
pub struct MetricsEngine<'c> {
    catalog: &'c Catalog,
    config: EngineConfig,
    jitter: Jitter,
    ranges: RangeTable,
}

impl MetricsEngine<'static> {
    /// Engine over the compiled-in catalog with default config
    pub fn builtin() -> std::result::Result<Self, CatalogError> {
        MetricsEngine::new(Catalog::builtin(), EngineConfig::default())
    }
}

impl<'c> MetricsEngine<'c> {
    /// Validate `catalog` and `config` and build an engine over them
    pub fn new(
        catalog: &'c Catalog,
        config: EngineConfig,
    ) -> std::result::Result<Self, CatalogError> {
        catalog.validate()?;
        config.validate()?;

        let mut ranges: RangeTable =
            [[MetricRange::new(0.0, 100.0); METRIC_COUNT]; SERVER_TYPE_COUNT];
        for server_type in ServerType::ALL {
            for metric in MetricType::ALL {
                ranges[server_type as usize][metric as usize] = catalog
                    .profile(server_type)
                    .and_then(|p| p.range(metric))
                    .ok_or(CatalogError::MissingRange {
                        server_type,
                        metric,
                    })?;
            }
        }

        debug!(
            scenarios = catalog.scenarios().len(),
            jitter_amplitude = config.jitter_amplitude,
            jitter_anchor_minutes = config.jitter_anchor_minutes,
            "Metrics engine ready"
        );

        Ok(Self {
            catalog,
            jitter: Jitter::from_config(&config),
            config,
            ranges,
        })
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cycle state at a time of day
    pub fn cycle_info_at(&self, time: TimeOfDay) -> CycleInfo<'c> {
        get_incident_cycle_info(self.catalog, time)
    }

    /// Cycle state at an epoch-millisecond timestamp
    pub fn cycle_info(&self, timestamp: TimestampMs) -> CycleInfo<'c> {
        self.cycle_info_at(TimeOfDay::from_timestamp(timestamp))
    }

    /// Profile range for a server type and metric
    pub fn range(&self, server_type: ServerType, metric: MetricType) -> MetricRange {
        self.ranges[server_type as usize][metric as usize]
    }

    /// Unperturbed baseline for the 10-minute slot containing `timestamp`
    pub fn baseline(
        &self,
        server_id: &str,
        server_type: ServerType,
        metric: MetricType,
        timestamp: TimestampMs,
    ) -> f64 {
        let slot = get_baseline_10min_slot(get_24_hour_cycle(timestamp));
        baseline_value(self.range(server_type, metric), slot, server_id, metric)
    }

    fn compose(
        &self,
        server_id: &str,
        server_type: ServerType,
        metric: MetricType,
        timestamp: TimestampMs,
        cycle: &CycleInfo<'_>,
    ) -> f64 {
        let baseline = self.baseline(server_id, server_type, metric, timestamp);
        let perturbed = generate_cycle_based_metric(server_id, metric, baseline, cycle);
        self.jitter.apply(perturbed, timestamp, server_id, metric)
    }

    /// One reading for (server, metric, minute)
    pub fn sample(
        &self,
        server_id: &str,
        server_type: ServerType,
        metric: MetricType,
        timestamp: TimestampMs,
    ) -> MetricSample {
        let cycle = self.cycle_info(timestamp);
        MetricSample {
            server_id: server_id.to_string(),
            metric,
            timestamp: normalize_timestamp(timestamp),
            value: self.compose(server_id, server_type, metric, timestamp, &cycle),
        }
    }

    /// Every metric for one server at one minute
    pub fn snapshot(
        &self,
        server_id: &str,
        server_type: ServerType,
        timestamp: TimestampMs,
    ) -> ServerSnapshot {
        let cycle = self.cycle_info(timestamp);
        let values: BTreeMap<MetricType, f64> = MetricType::ALL
            .into_iter()
            .map(|metric| {
                let value = self.compose(server_id, server_type, metric, timestamp, &cycle);
                (metric, value)
            })
            .collect();

        ServerSnapshot {
            server_id: server_id.to_string(),
            server_type,
            timestamp: normalize_timestamp(timestamp),
            phase: cycle.phase,
            scenario: cycle.scenario_name().map(str::to_string),
            affected: cycle.affects(server_id),
            values,
        }
    }

    /// Minute-aligned samples from `start` (inclusive) to `end` (exclusive).
    ///
    /// `step_ms` must be a positive whole number of minutes.
    pub fn series(
        &self,
        server_id: &str,
        server_type: ServerType,
        metric: MetricType,
        start: TimestampMs,
        end: TimestampMs,
        step_ms: u64,
    ) -> Result<Vec<MetricSample>> {
        if step_ms == 0 || step_ms % MINUTE_MS != 0 {
            return Err(EngineError::InvalidRange(format!(
                "step must be a positive multiple of {} ms, got {}",
                MINUTE_MS, step_ms
            )));
        }
        if start > end {
            return Err(EngineError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }

        let first = normalize_timestamp(start);
        let count = (end - first).div_ceil(step_ms);
        if count > MAX_SERIES_SAMPLES {
            return Err(EngineError::InvalidRange(format!(
                "{} samples requested, limit is {}",
                count, MAX_SERIES_SAMPLES
            )));
        }

        let samples: Vec<MetricSample> = (0..count)
            .map(|i| self.sample(server_id, server_type, metric, first + i * step_ms))
            .collect();

        debug!(
            server_id = %server_id,
            metric = %metric,
            samples = samples.len(),
            "Series generated"
        );

        Ok(samples)
    }

    /// Alerts for one server at `timestamp`
    pub fn alerts(
        &self,
        server_id: &str,
        server_type: ServerType,
        timestamp: TimestampMs,
    ) -> Vec<Alert> {
        let cycle = self.cycle_info(timestamp);
        generate_cycle_scenarios(&cycle, server_id, server_type, normalize_timestamp(timestamp))
    }

    /// Alerts across every server in the catalog's fleet
    pub fn fleet_alerts(&self, timestamp: TimestampMs) -> Vec<Alert> {
        let cycle = self.cycle_info(timestamp);
        let minute = normalize_timestamp(timestamp);
        self.catalog
            .servers()
            .iter()
            .flat_map(|server| {
                generate_cycle_scenarios(&cycle, &server.id, server.server_type, minute)
            })
            .collect()
    }

    /// Server type for a fleet server id
    pub fn resolve_server_type(&self, server_id: &str) -> Result<ServerType> {
        self.catalog
            .server_type_of(server_id)
            .ok_or_else(|| EngineError::UnknownServer(server_id.to_string()))
    }
}
