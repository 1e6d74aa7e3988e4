//! Synthetic alerts derived from the incident cycle
//!
//! Handles:
//! - Mapping phase intensity to an alert severity
//! - Emitting at most one alert per server per evaluation
//! - Formatting alerts for an Alertmanager-compatible feed

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cycle::{CycleInfo, Phase};
use crate::models::{ServerType, TimestampMs};

/// Intensity above which alerts are critical
const CRITICAL_INTENSITY: f64 = 0.7;

/// Intensity at or above which alerts are warnings
const WARNING_INTENSITY: f64 = 0.5;

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    /// Severity for a phase intensity; `None` when the phase is quiet
    pub fn from_intensity(intensity: f64) -> Option<Self> {
        if intensity > CRITICAL_INTENSITY {
            Some(AlertSeverity::Critical)
        } else if intensity >= WARNING_INTENSITY {
            Some(AlertSeverity::Warning)
        } else if intensity > 0.0 {
            Some(AlertSeverity::Info)
        } else {
            None
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "info"),
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Alert raised for a server affected by the active scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub server_id: String,
    pub server_type: ServerType,
    pub severity: AlertSeverity,
    pub scenario: String,
    pub phase: Phase,
    pub message: String,
    pub timestamp: TimestampMs,
}

/// Alertmanager webhook alert format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertmanagerAlert {
    /// Alert status (firing or resolved)
    pub status: String,
    /// Alert labels for routing and grouping
    pub labels: HashMap<String, String>,
    /// Alert annotations with details
    pub annotations: HashMap<String, String>,
    /// Start time in RFC3339 format
    pub starts_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
}

/// Alertmanager webhook payload (array of alerts)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertmanagerPayload {
    pub alerts: Vec<AlertmanagerAlert>,
}

impl AlertmanagerPayload {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        Self {
            alerts: alerts.iter().map(Alert::to_alertmanager).collect(),
        }
    }
}

/// Render an epoch-millisecond timestamp as RFC3339 (UTC)
pub fn format_rfc3339(timestamp: TimestampMs) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| timestamp.to_string())
}

impl Alert {
    /// Convert to the Alertmanager webhook shape
    pub fn to_alertmanager(&self) -> AlertmanagerAlert {
        let mut labels = HashMap::new();
        labels.insert("alertname".to_string(), alert_name(&self.scenario));
        labels.insert("severity".to_string(), self.severity.to_string());
        labels.insert("server".to_string(), self.server_id.clone());
        labels.insert("server_type".to_string(), self.server_type.to_string());
        labels.insert("scenario".to_string(), self.scenario.clone());

        let mut annotations = HashMap::new();
        annotations.insert(
            "summary".to_string(),
            format!("{} on {}", self.scenario, self.server_id),
        );
        annotations.insert("description".to_string(), self.message.clone());
        annotations.insert("phase".to_string(), self.phase.to_string());

        AlertmanagerAlert {
            status: "firing".to_string(),
            labels,
            annotations,
            starts_at: format_rfc3339(self.timestamp),
            ends_at: None,
        }
    }
}

/// "memory_leak_cycle" -> "MemoryLeakCycle"
fn alert_name(scenario: &str) -> String {
    scenario
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Alerts for one server under the given cycle state.
///
/// Returns an empty list when no scenario is active, the phase is quiet, or
/// the server is not in the scenario's affected set.
pub fn generate_cycle_scenarios(
    cycle: &CycleInfo<'_>,
    server_id: &str,
    server_type: ServerType,
    timestamp: TimestampMs,
) -> Vec<Alert> {
    let Some(scenario) = cycle.scenario else {
        return Vec::new();
    };
    if !scenario.affects(server_id) {
        return Vec::new();
    }
    let Some(severity) = AlertSeverity::from_intensity(cycle.intensity) else {
        return Vec::new();
    };

    let message = format!(
        "{} ({} phase, {:.0}% intensity) on {} server {}",
        scenario.description,
        cycle.phase,
        cycle.intensity * 100.0,
        server_type,
        server_id
    );

    vec![Alert {
        server_id: server_id.to_string(),
        server_type,
        severity,
        scenario: scenario.name.clone(),
        phase: cycle.phase,
        message,
        timestamp,
    }]
}
