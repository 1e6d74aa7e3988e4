//! Error types for the metrics engine
//!
//! Two classes exist: precondition violations raised per call
//! ([`EngineError`]) and catalog problems raised once when an engine is
//! built ([`CatalogError`]). Nothing in the engine fails transiently.

use thiserror::Error;

use crate::models::{MetricType, ServerType};

/// Invalid input handed to an engine operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unknown metric type '{0}' (expected cpu, memory, disk or network)")]
    UnknownMetricType(String),

    #[error("unknown server type '{0}'")]
    UnknownServerType(String),

    #[error("no fleet server named '{0}'")]
    UnknownServer(String),

    #[error("invalid time of day {hour:02}:{minute:02}")]
    InvalidTimeOfDay { hour: u32, minute: u32 },

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Catalog or engine configuration that failed validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("expected {expected} server profiles, found {found}")]
    ProfileCount { expected: usize, found: usize },

    #[error("server type {server_type} has no range for metric {metric}")]
    MissingRange {
        server_type: ServerType,
        metric: MetricType,
    },

    #[error("server type {server_type} metric {metric}: range [{min}, {max}] must satisfy 0 <= min < max <= 100")]
    InvalidRange {
        server_type: ServerType,
        metric: MetricType,
        min: f64,
        max: f64,
    },

    #[error("scenario '{name}' is bound to time slot {slot}, valid slots are 0..{max}")]
    SlotOutOfRange { name: String, slot: u8, max: u8 },

    #[error("time slot {slot} is bound to both '{first}' and '{second}'")]
    DuplicateSlot {
        slot: u8,
        first: String,
        second: String,
    },

    #[error("scenario '{name}' has a non-finite effect on {metric}")]
    NonFiniteEffect { name: String, metric: MetricType },

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
