//! End-to-end tests for the metrics engine
//!
//! These exercise the full baseline -> cycle effect -> jitter pipeline
//! through the public facade, against the compiled-in catalog.

#[cfg(test)]
mod engine_tests {
    use std::thread;

    use crate::alerts::AlertSeverity;
    use crate::catalog::Catalog;
    use crate::config::EngineConfig;
    use crate::cycle::Phase;
    use crate::engine::{MetricsEngine, MAX_SERIES_SAMPLES};
    use crate::error::{CatalogError, EngineError};
    use crate::models::{MetricType, ServerType};
    use crate::time_bucket::{DAY_MS, HOUR_MS, MINUTE_MS};

    /// 2024-01-01T00:00:00Z, a whole number of days since the epoch
    const DAY_START: u64 = 1_704_067_200_000;

    fn engine() -> MetricsEngine<'static> {
        MetricsEngine::builtin().unwrap()
    }

    fn quiet_engine(catalog: &Catalog) -> MetricsEngine<'_> {
        MetricsEngine::new(
            catalog,
            EngineConfig {
                jitter_amplitude: 0.0,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_samples_are_deterministic() {
        let a = engine();
        let b = MetricsEngine::new(Catalog::builtin(), EngineConfig::default()).unwrap();

        for minute in (0..1440).step_by(13) {
            let ts = DAY_START + minute * MINUTE_MS + 12_345;
            for metric in MetricType::ALL {
                let x = a.sample("db-primary-01", ServerType::Database, metric, ts);
                let y = b.sample("db-primary-01", ServerType::Database, metric, ts);
                assert_eq!(x.value.to_bits(), y.value.to_bits());
                assert_eq!(x, y);
            }
        }
    }

    #[test]
    fn test_samples_identical_across_threads() {
        let ts = DAY_START + 2 * HOUR_MS;
        let expected = engine().sample("backup-01", ServerType::Backup, MetricType::Disk, ts);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                thread::spawn(move || {
                    engine()
                        .sample("backup-01", ServerType::Backup, MetricType::Disk, ts)
                        .value
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().to_bits(), expected.value.to_bits());
        }
    }

    #[test]
    fn test_same_minute_same_value() {
        let e = engine();
        let ts = DAY_START + 9 * HOUR_MS + 17 * MINUTE_MS;
        let a = e.sample("web-01", ServerType::Web, MetricType::Cpu, ts);
        let b = e.sample("web-01", ServerType::Web, MetricType::Cpu, ts + 59_999);
        assert_eq!(a, b);
        assert_eq!(a.timestamp, ts);
    }

    #[test]
    fn test_daily_periodicity() {
        let e = engine();
        let ts = DAY_START + 13 * HOUR_MS + 42 * MINUTE_MS;
        let today = e.snapshot("api-02", ServerType::Api, ts);
        let tomorrow = e.snapshot("api-02", ServerType::Api, ts + DAY_MS);
        assert_eq!(today.values, tomorrow.values);
        assert_eq!(today.phase, tomorrow.phase);
    }

    #[test]
    fn test_values_always_clamped() {
        let e = engine();
        for server in Catalog::builtin().servers() {
            for minute in (0..1440).step_by(11) {
                let ts = DAY_START + minute * MINUTE_MS;
                let snapshot = e.snapshot(&server.id, server.server_type, ts);
                for value in snapshot.values.values() {
                    assert!((0.0..=100.0).contains(value), "{} gave {}", server.id, value);
                }
            }
        }
    }

    #[test]
    fn test_huge_jitter_still_clamped() {
        let e = MetricsEngine::new(
            Catalog::builtin(),
            EngineConfig {
                jitter_amplitude: 500.0,
                jitter_anchor_minutes: 1,
            },
        )
        .unwrap();
        for minute in 0..240 {
            let ts = minute * MINUTE_MS;
            let s = e.sample("backup-01", ServerType::Backup, MetricType::Disk, ts);
            assert!((0.0..=100.0).contains(&s.value));
        }
    }

    #[test]
    fn test_peak_lifts_affected_server_only() {
        let catalog = Catalog::builtin();
        let e = quiet_engine(catalog);

        // backup_cycle peak at 02:00 adds +30 disk to backup-01
        let peak = DAY_START + 2 * HOUR_MS;
        let baseline = e.baseline("backup-01", ServerType::Backup, MetricType::Disk, peak);
        let sample = e.sample("backup-01", ServerType::Backup, MetricType::Disk, peak);
        assert!((sample.value - (baseline + 30.0).min(100.0)).abs() < 1e-9);

        let untouched = e.sample("web-01", ServerType::Web, MetricType::Disk, peak);
        let web_baseline = e.baseline("web-01", ServerType::Web, MetricType::Disk, peak);
        assert_eq!(untouched.value, web_baseline);
    }

    #[test]
    fn test_baseline_within_profile_range() {
        let e = engine();
        for server_type in ServerType::ALL {
            for metric in MetricType::ALL {
                let range = e.range(server_type, metric);
                for slot in 0..144u64 {
                    let v = e.baseline("probe", server_type, metric, slot * 10 * MINUTE_MS);
                    assert!(v >= range.min && v <= range.max);
                }
            }
        }
    }

    #[test]
    fn test_snapshot_reports_cycle_state() {
        let e = engine();
        let snapshot = e.snapshot("lb-01", ServerType::LoadBalancer, DAY_START + 10 * HOUR_MS);
        assert_eq!(snapshot.scenario.as_deref(), Some("traffic_surge_cycle"));
        assert_eq!(snapshot.phase, Phase::Peak);
        assert!(snapshot.affected);
        assert_eq!(snapshot.values.len(), MetricType::ALL.len());

        let calm = e.snapshot("lb-01", ServerType::LoadBalancer, DAY_START + 8 * HOUR_MS);
        assert_eq!(calm.phase, Phase::Normal);
        assert!(!calm.affected);
    }

    #[test]
    fn test_series_one_day_of_minutes() {
        let e = engine();
        let series = e
            .series(
                "cache-01",
                ServerType::Cache,
                MetricType::Memory,
                DAY_START,
                DAY_START + DAY_MS,
                MINUTE_MS,
            )
            .unwrap();
        assert_eq!(series.len(), 1440);
        assert_eq!(series[0].timestamp, DAY_START);
        assert_eq!(series[1439].timestamp, DAY_START + DAY_MS - MINUTE_MS);

        // adjacent minutes move smoothly unless a phase boundary is crossed
        let max_step = series
            .windows(2)
            .map(|w| (w[1].value - w[0].value).abs())
            .fold(0.0, f64::max);
        assert!(max_step <= 40.0, "max step {}", max_step);
    }

    #[test]
    fn test_series_step_and_alignment() {
        let e = engine();
        let series = e
            .series(
                "web-01",
                ServerType::Web,
                MetricType::Cpu,
                DAY_START + 30_000,
                DAY_START + HOUR_MS,
                5 * MINUTE_MS,
            )
            .unwrap();
        assert_eq!(series.len(), 12);
        assert!(series.iter().all(|s| s.timestamp % MINUTE_MS == 0));
        assert_eq!(series[1].timestamp - series[0].timestamp, 5 * MINUTE_MS);
    }

    #[test]
    fn test_series_rejects_bad_ranges() {
        let e = engine();
        let bad_step = e.series("web-01", ServerType::Web, MetricType::Cpu, 0, HOUR_MS, 30_000);
        assert!(matches!(bad_step, Err(EngineError::InvalidRange(_))));

        let zero_step = e.series("web-01", ServerType::Web, MetricType::Cpu, 0, HOUR_MS, 0);
        assert!(matches!(zero_step, Err(EngineError::InvalidRange(_))));

        let reversed = e.series("web-01", ServerType::Web, MetricType::Cpu, HOUR_MS, 0, MINUTE_MS);
        assert!(matches!(reversed, Err(EngineError::InvalidRange(_))));

        let too_long = e.series(
            "web-01",
            ServerType::Web,
            MetricType::Cpu,
            0,
            (MAX_SERIES_SAMPLES + 1) * MINUTE_MS,
            MINUTE_MS,
        );
        assert!(matches!(too_long, Err(EngineError::InvalidRange(_))));

        let empty = e
            .series("web-01", ServerType::Web, MetricType::Cpu, HOUR_MS, HOUR_MS, MINUTE_MS)
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_alerts_follow_phases() {
        let e = engine();
        let peak = e.alerts("backup-01", ServerType::Backup, DAY_START + 2 * HOUR_MS + 5_000);
        assert_eq!(peak.len(), 1);
        assert_eq!(peak[0].severity, AlertSeverity::Critical);
        assert_eq!(peak[0].timestamp, DAY_START + 2 * HOUR_MS);

        assert!(e.alerts("backup-01", ServerType::Backup, DAY_START).is_empty());
        assert!(e.alerts("web-01", ServerType::Web, DAY_START + 2 * HOUR_MS).is_empty());
    }

    #[test]
    fn test_fleet_alerts_cover_affected_servers() {
        let e = engine();
        let ts = DAY_START + 22 * HOUR_MS;
        let alerts = e.fleet_alerts(ts);
        let mut servers: Vec<&str> = alerts.iter().map(|a| a.server_id.as_str()).collect();
        servers.sort_unstable();
        assert_eq!(servers, vec!["api-02", "db-replica-01", "monitoring-01"]);
        assert!(alerts.iter().all(|a| a.scenario == "batch_processing_cycle"));

        assert!(e.fleet_alerts(DAY_START + 20 * HOUR_MS).is_empty());
    }

    #[test]
    fn test_resolve_server_type() {
        let e = engine();
        assert_eq!(e.resolve_server_type("mail-01"), Ok(ServerType::Mail));
        assert_eq!(
            e.resolve_server_type("nope-99"),
            Err(EngineError::UnknownServer("nope-99".to_string()))
        );
    }

    #[test]
    fn test_construction_validates() {
        let sparse = Catalog::new(
            Catalog::builtin().profiles().take(3).cloned(),
            Vec::new(),
            Vec::new(),
        );
        assert!(matches!(
            MetricsEngine::new(&sparse, EngineConfig::default()),
            Err(CatalogError::ProfileCount { .. })
        ));

        let bad_config = EngineConfig {
            jitter_amplitude: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            MetricsEngine::new(Catalog::builtin(), bad_config),
            Err(CatalogError::InvalidConfig(_))
        ));
    }
}
