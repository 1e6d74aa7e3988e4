//! Deterministic synthetic server metrics
//!
//! This crate provides the core functionality for:
//! - Time bucketing over a fixed epoch-relative 24h cycle
//! - FNV-1a hashing as a seedless source of randomness
//! - A compiled-in catalog of server profiles and incident scenarios
//! - The incident cycle state machine and metric composition
//! - Synthetic alerts and structured logging
//!
//! Every output is a pure function of (server, metric, timestamp, catalog).

pub mod alerts;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod hash;
pub mod models;
pub mod observability;
pub mod time_bucket;

pub use alerts::{generate_cycle_scenarios, Alert, AlertSeverity, AlertmanagerPayload};
pub use catalog::{Catalog, MetricRange, Scenario, ServerEntry, ServerProfile};
pub use composer::{generate_cycle_based_metric, interpolate_1min_variation};
pub use config::EngineConfig;
pub use cycle::{get_incident_cycle_info, CycleInfo, Phase};
pub use engine::MetricsEngine;
pub use error::{CatalogError, EngineError};
pub use hash::fnv1a_hash;
pub use models::*;
pub use observability::StructuredLogger;
pub use time_bucket::{get_24_hour_cycle, get_baseline_10min_slot, normalize_timestamp, TimeOfDay};
