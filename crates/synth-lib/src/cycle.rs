//! Incident cycle state machine
//!
//! Each 4-hour window runs one scenario through five phases. The state is
//! recomputed from the time of day on every call; no transition history is
//! kept and the cycle restarts identically every window.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Scenario, SLOT_HOURS};
use crate::time_bucket::TimeOfDay;

/// Minutes in one scenario window
const SLOT_MINUTES: u32 = SLOT_HOURS * 60;

/// Phase of the active scenario within its window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Normal,
    Incident,
    Peak,
    Resolving,
    Resolved,
}

/// Ordered (exclusive upper bound on progress, phase, intensity) table
const PHASE_TABLE: [(f64, Phase, f64); 5] = [
    (0.2, Phase::Normal, 0.0),
    (0.5, Phase::Incident, 0.7),
    (0.8, Phase::Peak, 1.0),
    (0.95, Phase::Resolving, 0.3),
    (1.0, Phase::Resolved, 0.0),
];

impl Phase {
    /// Classify progress through a window (0 <= progress < 1)
    pub fn classify(progress: f64) -> Phase {
        PHASE_TABLE
            .iter()
            .find(|(upper, _, _)| progress < *upper)
            .map(|(_, phase, _)| *phase)
            .unwrap_or(Phase::Resolved)
    }

    /// How strongly this phase perturbs affected servers
    pub fn intensity(&self) -> f64 {
        PHASE_TABLE
            .iter()
            .find(|(_, phase, _)| phase == self)
            .map(|(_, _, intensity)| *intensity)
            .unwrap_or(0.0)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Normal => "normal",
            Phase::Incident => "incident",
            Phase::Peak => "peak",
            Phase::Resolving => "resolving",
            Phase::Resolved => "resolved",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cycle state evaluated at one time of day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleInfo<'a> {
    pub time_slot: u8,
    pub time_of_day: TimeOfDay,
    pub scenario: Option<&'a Scenario>,
    pub phase: Phase,
    pub intensity: f64,
    pub progress: f64,
    pub description: String,
    pub expected_resolution: Option<String>,
}

impl<'a> CycleInfo<'a> {
    /// Name of the active scenario, if any
    pub fn scenario_name(&self) -> Option<&'a str> {
        self.scenario.map(|s| s.name.as_str())
    }

    /// True when the active scenario currently perturbs `server_id`
    pub fn affects(&self, server_id: &str) -> bool {
        self.intensity > 0.0 && self.scenario.is_some_and(|s| s.affects(server_id))
    }
}

/// Evaluate the incident cycle at a time of day
pub fn get_incident_cycle_info(catalog: &Catalog, time: TimeOfDay) -> CycleInfo<'_> {
    let time_slot = (time.hour() / SLOT_HOURS) as u8;
    let minute_in_slot = (time.hour() % SLOT_HOURS) * 60 + time.minute();
    let progress = f64::from(minute_in_slot) / f64::from(SLOT_MINUTES);
    let phase = Phase::classify(progress);
    let scenario = catalog.scenario_for_slot(time_slot);

    let (description, expected_resolution) = match scenario {
        Some(s) => (s.description.clone(), s.expected_resolution.clone()),
        None => ("No scenario scheduled for this window".to_string(), None),
    };

    CycleInfo {
        time_slot,
        time_of_day: time,
        scenario,
        phase,
        intensity: phase.intensity(),
        progress,
        description,
        expected_resolution,
    }
}
