//! Compiled-in catalog: server profiles, incident scenarios and the fleet
//!
//! The catalog is built once, validated once, and then only ever read.
//! Engines borrow it; nothing mutates it after construction.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::models::{MetricType, ServerType};

/// Number of 4-hour scenario windows in a day
pub const TIME_SLOTS: u8 = 6;

/// Hours covered by each scenario window
pub const SLOT_HOURS: u32 = 4;

/// Inclusive baseline range for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && 0.0 <= self.min
            && self.min < self.max
            && self.max <= 100.0
    }
}

/// Baseline ranges for one server type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerProfile {
    pub server_type: ServerType,
    pub ranges: BTreeMap<MetricType, MetricRange>,
}

impl ServerProfile {
    fn new(
        server_type: ServerType,
        cpu: (f64, f64),
        memory: (f64, f64),
        disk: (f64, f64),
        network: (f64, f64),
    ) -> Self {
        let ranges = [
            (MetricType::Cpu, cpu),
            (MetricType::Memory, memory),
            (MetricType::Disk, disk),
            (MetricType::Network, network),
        ]
        .into_iter()
        .map(|(metric, (min, max))| (metric, MetricRange::new(min, max)))
        .collect();

        Self {
            server_type,
            ranges,
        }
    }

    /// Range for a metric. Validated catalogs always have one.
    pub fn range(&self, metric: MetricType) -> Option<MetricRange> {
        self.ranges.get(&metric).copied()
    }
}

/// A recurring incident bound to one 4-hour window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub time_slot: u8,
    pub affected_servers: BTreeSet<String>,
    /// Additive effect at full intensity, per metric
    pub metric_effects: BTreeMap<MetricType, f64>,
    pub description: String,
    pub expected_resolution: Option<String>,
}

impl Scenario {
    pub fn affects(&self, server_id: &str) -> bool {
        self.affected_servers.contains(server_id)
    }

    /// Effect at full intensity; metrics the scenario ignores contribute 0
    pub fn effect(&self, metric: MetricType) -> f64 {
        self.metric_effects.get(&metric).copied().unwrap_or(0.0)
    }

    /// Wall-clock window covered by the scenario, e.g. "04:00-08:00"
    pub fn window(&self) -> String {
        let start = u32::from(self.time_slot) * SLOT_HOURS;
        format!("{:02}:00-{:02}:00", start, start + SLOT_HOURS)
    }
}

/// A named server in the simulated fleet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub id: String,
    pub server_type: ServerType,
}

/// Read-only bundle of everything the engine looks up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    profiles: BTreeMap<ServerType, ServerProfile>,
    scenarios: Vec<Scenario>,
    servers: Vec<ServerEntry>,
}

static BUILTIN: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    pub fn new(
        profiles: impl IntoIterator<Item = ServerProfile>,
        scenarios: Vec<Scenario>,
        servers: Vec<ServerEntry>,
    ) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.server_type, p)).collect(),
            scenarios,
            servers,
        }
    }

    /// The compiled-in catalog, built on first use
    pub fn builtin() -> &'static Catalog {
        BUILTIN.get_or_init(|| {
            Catalog::new(builtin_profiles(), builtin_scenarios(), builtin_servers())
        })
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ServerProfile> {
        self.profiles.values()
    }

    pub fn profile(&self, server_type: ServerType) -> Option<&ServerProfile> {
        self.profiles.get(&server_type)
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Scenario bound to a 4-hour window, if the catalog defines one
    pub fn scenario_for_slot(&self, time_slot: u8) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.time_slot == time_slot)
    }

    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn servers(&self) -> &[ServerEntry] {
        &self.servers
    }

    /// Look up a fleet server's type by id
    pub fn server_type_of(&self, server_id: &str) -> Option<ServerType> {
        self.servers
            .iter()
            .find(|s| s.id == server_id)
            .map(|s| s.server_type)
    }

    /// Check every structural rule the per-call code relies on.
    ///
    /// Slots without a scenario are allowed; they simply never alert.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.profiles.len() != ServerType::ALL.len() {
            return Err(CatalogError::ProfileCount {
                expected: ServerType::ALL.len(),
                found: self.profiles.len(),
            });
        }

        for profile in self.profiles.values() {
            for metric in MetricType::ALL {
                let range = profile.range(metric).ok_or(CatalogError::MissingRange {
                    server_type: profile.server_type,
                    metric,
                })?;
                if !range.is_valid() {
                    return Err(CatalogError::InvalidRange {
                        server_type: profile.server_type,
                        metric,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
        }

        let mut bound: BTreeMap<u8, &str> = BTreeMap::new();
        for scenario in &self.scenarios {
            if scenario.time_slot >= TIME_SLOTS {
                return Err(CatalogError::SlotOutOfRange {
                    name: scenario.name.clone(),
                    slot: scenario.time_slot,
                    max: TIME_SLOTS,
                });
            }
            if let Some(first) = bound.insert(scenario.time_slot, &scenario.name) {
                return Err(CatalogError::DuplicateSlot {
                    slot: scenario.time_slot,
                    first: first.to_string(),
                    second: scenario.name.clone(),
                });
            }
            if let Some((metric, _)) = scenario
                .metric_effects
                .iter()
                .find(|(_, effect)| !effect.is_finite())
            {
                return Err(CatalogError::NonFiniteEffect {
                    name: scenario.name.clone(),
                    metric: *metric,
                });
            }
        }

        Ok(())
    }
}

fn builtin_profiles() -> Vec<ServerProfile> {
    use ServerType::*;
    vec![
        ServerProfile::new(Web, (20.0, 55.0), (35.0, 60.0), (25.0, 45.0), (30.0, 65.0)),
        ServerProfile::new(Api, (25.0, 60.0), (40.0, 65.0), (20.0, 40.0), (35.0, 70.0)),
        ServerProfile::new(Database, (30.0, 65.0), (55.0, 80.0), (45.0, 70.0), (20.0, 50.0)),
        ServerProfile::new(Cache, (15.0, 40.0), (60.0, 85.0), (10.0, 25.0), (30.0, 60.0)),
        ServerProfile::new(Monitoring, (10.0, 35.0), (30.0, 50.0), (35.0, 60.0), (15.0, 35.0)),
        ServerProfile::new(Security, (15.0, 45.0), (25.0, 45.0), (20.0, 40.0), (20.0, 45.0)),
        ServerProfile::new(Backup, (5.0, 25.0), (20.0, 40.0), (50.0, 80.0), (10.0, 30.0)),
        ServerProfile::new(LoadBalancer, (15.0, 45.0), (20.0, 40.0), (10.0, 20.0), (40.0, 75.0)),
        ServerProfile::new(File, (10.0, 30.0), (25.0, 45.0), (55.0, 85.0), (20.0, 50.0)),
        ServerProfile::new(Mail, (10.0, 35.0), (30.0, 50.0), (30.0, 55.0), (15.0, 40.0)),
    ]
}

fn scenario(
    name: &str,
    time_slot: u8,
    affected: &[&str],
    effects: &[(MetricType, f64)],
    description: &str,
    expected_resolution: Option<&str>,
) -> Scenario {
    Scenario {
        name: name.to_string(),
        time_slot,
        affected_servers: affected.iter().map(|s| s.to_string()).collect(),
        metric_effects: effects.iter().copied().collect(),
        description: description.to_string(),
        expected_resolution: expected_resolution.map(str::to_string),
    }
}

fn builtin_scenarios() -> Vec<Scenario> {
    use MetricType::*;
    vec![
        scenario(
            "backup_cycle",
            0,
            &["backup-01", "db-primary-01", "file-01"],
            &[(Disk, 30.0), (Network, 25.0), (Cpu, 15.0), (Memory, 10.0)],
            "Nightly full backup saturating disk and network I/O",
            Some("Backup job completes and I/O returns to baseline by 04:00"),
        ),
        scenario(
            "maintenance_cycle",
            1,
            &["db-primary-01", "db-replica-01", "cache-01"],
            &[(Cpu, 25.0), (Memory, 20.0), (Disk, 15.0), (Network, 5.0)],
            "Scheduled index rebuild and cache warm-up during the maintenance window",
            Some("Maintenance window closes at 08:00"),
        ),
        scenario(
            "traffic_surge_cycle",
            2,
            &["web-01", "web-02", "lb-01", "api-01"],
            &[(Cpu, 35.0), (Network, 30.0), (Memory, 15.0)],
            "Morning traffic surge overloading the web tier",
            Some("Autoscaling absorbs the surge before noon"),
        ),
        scenario(
            "memory_leak_cycle",
            3,
            &["api-01", "api-02", "cache-01"],
            &[(Memory, 35.0), (Cpu, 10.0)],
            "Memory leak in the API service after a deploy",
            Some("Rolling restart releases leaked memory"),
        ),
        scenario(
            "security_scan_cycle",
            4,
            &["security-01", "mail-01", "file-01"],
            &[(Cpu, 30.0), (Disk, 20.0), (Network, 15.0)],
            "Full vulnerability scan and mail filtering spike",
            Some("Scan finishes and quarantines complete by 20:00"),
        ),
        scenario(
            "batch_processing_cycle",
            5,
            &["api-02", "db-replica-01", "monitoring-01"],
            &[(Cpu, 30.0), (Memory, 25.0), (Disk, 20.0), (Network, 10.0)],
            "Evening batch analytics jobs contending for the replica",
            None,
        ),
    ]
}

fn builtin_servers() -> Vec<ServerEntry> {
    use ServerType::*;
    [
        ("web-01", Web),
        ("web-02", Web),
        ("api-01", Api),
        ("api-02", Api),
        ("db-primary-01", Database),
        ("db-replica-01", Database),
        ("cache-01", Cache),
        ("monitoring-01", Monitoring),
        ("security-01", Security),
        ("backup-01", Backup),
        ("lb-01", LoadBalancer),
        ("file-01", File),
        ("mail-01", Mail),
    ]
    .into_iter()
    .map(|(id, server_type)| ServerEntry {
        id: id.to_string(),
        server_type,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        assert_eq!(Catalog::builtin().validate(), Ok(()));
    }

    #[test]
    fn test_profile_shape() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.profiles().count(), 10);
        for profile in catalog.profiles() {
            for metric in MetricType::ALL {
                let range = profile.range(metric).unwrap();
                assert!(0.0 <= range.min && range.min < range.max && range.max <= 100.0);
            }
        }
    }

    #[test]
    fn test_six_scenarios_one_per_slot() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.scenarios().len(), TIME_SLOTS as usize);
        for slot in 0..TIME_SLOTS {
            assert_eq!(catalog.scenario_for_slot(slot).unwrap().time_slot, slot);
        }
        assert_eq!(catalog.scenario_for_slot(0).unwrap().name, "backup_cycle");
        assert_eq!(catalog.scenario_for_slot(1).unwrap().name, "maintenance_cycle");
        assert!(catalog.scenario_for_slot(TIME_SLOTS).is_none());
    }

    #[test]
    fn test_affected_servers_are_in_fleet() {
        let catalog = Catalog::builtin();
        for scenario in catalog.scenarios() {
            for server in &scenario.affected_servers {
                assert!(
                    catalog.server_type_of(server).is_some(),
                    "{} affects unknown server {}",
                    scenario.name,
                    server
                );
            }
        }
    }

    #[test]
    fn test_fleet_covers_every_server_type() {
        let catalog = Catalog::builtin();
        for server_type in ServerType::ALL {
            assert!(catalog.servers().iter().any(|s| s.server_type == server_type));
        }
    }

    #[test]
    fn test_scenario_window() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.scenario("maintenance_cycle").unwrap().window(), "04:00-08:00");
        assert_eq!(catalog.scenario("batch_processing_cycle").unwrap().window(), "20:00-24:00");
    }

    #[test]
    fn test_validate_rejects_missing_profile() {
        let mut profiles = builtin_profiles();
        profiles.pop();
        let catalog = Catalog::new(profiles, builtin_scenarios(), builtin_servers());
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::ProfileCount {
                expected: 10,
                found: 9
            })
        );
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut profiles = builtin_profiles();
        profiles[0]
            .ranges
            .insert(MetricType::Cpu, MetricRange::new(60.0, 40.0));
        let catalog = Catalog::new(profiles, builtin_scenarios(), builtin_servers());
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_metric() {
        let mut profiles = builtin_profiles();
        profiles[3].ranges.remove(&MetricType::Disk);
        let catalog = Catalog::new(profiles, builtin_scenarios(), builtin_servers());
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::MissingRange {
                server_type: ServerType::Cache,
                metric: MetricType::Disk
            })
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_slot() {
        let mut scenarios = builtin_scenarios();
        scenarios[1].time_slot = 0;
        let catalog = Catalog::new(builtin_profiles(), scenarios, builtin_servers());
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateSlot { slot: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_slot_and_effect() {
        let mut scenarios = builtin_scenarios();
        scenarios[5].time_slot = 6;
        let catalog = Catalog::new(builtin_profiles(), scenarios, builtin_servers());
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::SlotOutOfRange { slot: 6, .. })
        ));

        let mut scenarios = builtin_scenarios();
        scenarios[2].metric_effects.insert(MetricType::Cpu, f64::NAN);
        let catalog = Catalog::new(builtin_profiles(), scenarios, builtin_servers());
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::NonFiniteEffect { .. })
        ));
    }

    #[test]
    fn test_sparse_catalog_is_allowed() {
        let mut scenarios = builtin_scenarios();
        scenarios.retain(|s| s.time_slot != 3);
        let catalog = Catalog::new(builtin_profiles(), scenarios, builtin_servers());
        assert_eq!(catalog.validate(), Ok(()));
        assert!(catalog.scenario_for_slot(3).is_none());
    }
}
