//! Core data models for the metrics engine

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cycle::Phase;
use crate::error::EngineError;

/// Milliseconds since the Unix epoch
pub type TimestampMs = u64;

/// Metric families produced for every server
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Cpu,
    Memory,
    Disk,
    Network,
}

impl MetricType {
    pub const ALL: [MetricType; 4] = [
        MetricType::Cpu,
        MetricType::Memory,
        MetricType::Disk,
        MetricType::Network,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Cpu => "cpu",
            MetricType::Memory => "memory",
            MetricType::Disk => "disk",
            MetricType::Network => "network",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricType::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| EngineError::UnknownMetricType(s.to_string()))
    }
}

/// Server roles with their own baseline profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerType {
    Web,
    Api,
    Database,
    Cache,
    Monitoring,
    Security,
    Backup,
    LoadBalancer,
    File,
    Mail,
}

impl ServerType {
    pub const ALL: [ServerType; 10] = [
        ServerType::Web,
        ServerType::Api,
        ServerType::Database,
        ServerType::Cache,
        ServerType::Monitoring,
        ServerType::Security,
        ServerType::Backup,
        ServerType::LoadBalancer,
        ServerType::File,
        ServerType::Mail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerType::Web => "web",
            ServerType::Api => "api",
            ServerType::Database => "database",
            ServerType::Cache => "cache",
            ServerType::Monitoring => "monitoring",
            ServerType::Security => "security",
            ServerType::Backup => "backup",
            ServerType::LoadBalancer => "load_balancer",
            ServerType::File => "file",
            ServerType::Mail => "mail",
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServerType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EngineError::UnknownServerType(s.to_string()))
    }
}

/// One generated reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub server_id: String,
    pub metric: MetricType,
    /// Minute-normalized timestamp the value belongs to
    pub timestamp: TimestampMs,
    /// Always within [0, 100]
    pub value: f64,
}

/// Every metric of one server at one minute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSnapshot {
    pub server_id: String,
    pub server_type: ServerType,
    pub timestamp: TimestampMs,
    pub phase: Phase,
    /// Active scenario name, if any
    pub scenario: Option<String>,
    /// Whether the active scenario perturbs this server
    pub affected: bool,
    pub values: BTreeMap<MetricType, f64>,
}
