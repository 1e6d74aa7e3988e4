//! Metric composition: daily baseline, cycle effect and minute jitter
//!
//! A reading is built in three steps. The baseline follows a diurnal curve
//! inside the server type's profile range, the active scenario adds its
//! scaled effect on affected servers, and a smooth per-minute jitter is
//! layered on top. Every step clamps to [0, 100].

use std::f64::consts::TAU;

use crate::catalog::MetricRange;
use crate::config::EngineConfig;
use crate::cycle::CycleInfo;
use crate::hash::fnv1a_hash;
use crate::models::{MetricType, TimestampMs};
use crate::time_bucket::{normalize_timestamp, BASELINE_SLOTS, MINUTE_MS};

/// Baseline slot with the daily peak (14:00)
const PEAK_SLOT: f64 = 84.0;

/// Share of the baseline driven by the diurnal curve; the rest is per-slot noise
const DIURNAL_WEIGHT: f64 = 0.7;

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Baseline for a 10-minute slot, always inside `range`
pub fn baseline_value(range: MetricRange, slot: u32, server_id: &str, metric: MetricType) -> f64 {
    let phase = (f64::from(slot) - PEAK_SLOT) / f64::from(BASELINE_SLOTS);
    let diurnal = 0.5 + 0.5 * (TAU * phase).cos();
    let noise = fnv1a_hash(&format!("{}:{}:slot{}", server_id, metric, slot));
    let weight = DIURNAL_WEIGHT * diurnal + (1.0 - DIURNAL_WEIGHT) * noise;

    (range.min + range.span() * weight).clamp(range.min, range.max)
}

/// Apply the active scenario's effect to a baseline value.
///
/// Unaffected servers and zero-intensity phases pass the baseline through.
pub fn generate_cycle_based_metric(
    server_id: &str,
    metric: MetricType,
    baseline_value: f64,
    cycle: &CycleInfo<'_>,
) -> f64 {
    let effect = match cycle.scenario {
        Some(scenario) if cycle.affects(server_id) => scenario.effect(metric) * cycle.intensity,
        _ => 0.0,
    };
    clamp_percent(baseline_value + effect)
}

/// Smooth deterministic jitter keyed on (server, metric, minute)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    amplitude: f64,
    anchor_ms: u64,
}

impl Default for Jitter {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Jitter {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            amplitude: config.jitter_amplitude,
            anchor_ms: config.jitter_anchor_minutes.max(1) * MINUTE_MS,
        }
    }

    /// Signed delta at an anchor timestamp, within [-amplitude, amplitude]
    fn anchor_delta(&self, anchor: TimestampMs, server_id: &str, metric: MetricType) -> f64 {
        let h = fnv1a_hash(&format!("{}:{}:{}", server_id, metric, anchor));
        (h - 0.5) * 2.0 * self.amplitude
    }

    /// Jitter delta for the minute containing `timestamp`
    pub fn delta(&self, timestamp: TimestampMs, server_id: &str, metric: MetricType) -> f64 {
        let minute = normalize_timestamp(timestamp);
        let start = minute - minute % self.anchor_ms;
        let end = start.saturating_add(self.anchor_ms);
        let frac = (minute - start) as f64 / self.anchor_ms as f64;

        let from = self.anchor_delta(start, server_id, metric);
        let to = self.anchor_delta(end, server_id, metric);
        from + (to - from) * frac
    }

    pub fn apply(
        &self,
        base_value: f64,
        timestamp: TimestampMs,
        server_id: &str,
        metric: MetricType,
    ) -> f64 {
        clamp_percent(base_value + self.delta(timestamp, server_id, metric))
    }
}

/// Add per-minute jitter with the default amplitude and anchor spacing
pub fn interpolate_1min_variation(
    base_value: f64,
    timestamp: TimestampMs,
    server_id: &str,
    metric: MetricType,
) -> f64 {
    Jitter::default().apply(base_value, timestamp, server_id, metric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::cycle::get_incident_cycle_info;
    use crate::time_bucket::{TimeOfDay, DAY_MS};

    fn cycle(hour: u32, minute: u32) -> CycleInfo<'static> {
        get_incident_cycle_info(Catalog::builtin(), TimeOfDay::new(hour, minute).unwrap())
    }

    #[test]
    fn test_baseline_stays_in_range() {
        let range = MetricRange::new(20.0, 55.0);
        for slot in 0..BASELINE_SLOTS {
            let v = baseline_value(range, slot, "web-01", MetricType::Cpu);
            assert!((20.0..=55.0).contains(&v), "slot {} gave {}", slot, v);
        }
    }

    #[test]
    fn test_baseline_follows_daily_curve() {
        let range = MetricRange::new(0.0, 100.0);
        let mean_around = |center: u32| {
            (center - 6..center + 6)
                .map(|slot| baseline_value(range, slot, "api-01", MetricType::Cpu))
                .sum::<f64>()
                / 12.0
        };
        // 02:00 trough versus 14:00 peak
        assert!(mean_around(84) > mean_around(12) + 30.0);
    }

    #[test]
    fn test_affected_server_gets_scaled_effect() {
        // backup_cycle peak: disk +30 at intensity 1.0
        let peak = cycle(2, 0);
        let v = generate_cycle_based_metric("backup-01", MetricType::Disk, 50.0, &peak);
        assert_eq!(v, 80.0);

        // incident phase scales by 0.7
        let incident = cycle(1, 0);
        let v = generate_cycle_based_metric("backup-01", MetricType::Disk, 50.0, &incident);
        assert!((v - 71.0).abs() < 1e-9);
    }

    #[test]
    fn test_unaffected_or_idle_passes_through() {
        let peak = cycle(2, 0);
        assert_eq!(
            generate_cycle_based_metric("web-01", MetricType::Disk, 42.5, &peak),
            42.5
        );

        let normal = cycle(0, 5);
        assert_eq!(
            generate_cycle_based_metric("backup-01", MetricType::Disk, 42.5, &normal),
            42.5
        );
    }

    #[test]
    fn test_cycle_metric_clamps() {
        let peak = cycle(2, 0);
        assert_eq!(
            generate_cycle_based_metric("backup-01", MetricType::Disk, 95.0, &peak),
            100.0
        );
        assert_eq!(
            generate_cycle_based_metric("web-01", MetricType::Cpu, -20.0, &peak),
            0.0
        );
        assert_eq!(
            generate_cycle_based_metric("web-01", MetricType::Cpu, 250.0, &peak),
            100.0
        );
    }

    #[test]
    fn test_jitter_is_deterministic_per_minute() {
        let ts = 1_700_000_000_000;
        let minute = normalize_timestamp(ts);
        let a = interpolate_1min_variation(50.0, ts, "db-primary-01", MetricType::Memory);
        let later = minute + 59_999;
        let b = interpolate_1min_variation(50.0, later, "db-primary-01", MetricType::Memory);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_jitter_is_bounded_and_smooth() {
        let jitter = Jitter::default();
        let mut previous: Option<f64> = None;
        for minute in 0..(DAY_MS / MINUTE_MS) {
            let d = jitter.delta(minute * MINUTE_MS, "web-02", MetricType::Network);
            assert!(d.abs() <= 3.0 + 1e-9);
            if let Some(p) = previous {
                // at most 2 * amplitude / anchor spacing per minute
                assert!((d - p).abs() <= 1.2 + 1e-9);
            }
            previous = Some(d);
        }
    }

    #[test]
    fn test_jitter_varies_between_series() {
        let jitter = Jitter::default();
        let deltas: Vec<f64> = (0..60)
            .map(|m| jitter.delta(m * MINUTE_MS, "cache-01", MetricType::Cpu))
            .collect();
        assert!(deltas.iter().any(|d| (d - deltas[0]).abs() > 1e-6));

        let other = jitter.delta(17 * MINUTE_MS, "cache-01", MetricType::Memory);
        assert_ne!(other, deltas[17]);
    }

    #[test]
    fn test_jitter_output_clamped() {
        for ts in (0..120).map(|m| m * MINUTE_MS) {
            let low = interpolate_1min_variation(0.0, ts, "lb-01", MetricType::Cpu);
            let high = interpolate_1min_variation(100.0, ts, "lb-01", MetricType::Cpu);
            assert!((0.0..=100.0).contains(&low));
            assert!((0.0..=100.0).contains(&high));
        }
    }

    #[test]
    fn test_zero_amplitude_is_identity() {
        let jitter = Jitter::from_config(&EngineConfig {
            jitter_amplitude: 0.0,
            ..Default::default()
        });
        assert_eq!(jitter.apply(37.25, 123_456_789, "mail-01", MetricType::Disk), 37.25);
    }
}
