//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Tunables for minute-level jitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum jitter excursion in percentage points
    #[serde(default = "default_jitter_amplitude")]
    pub jitter_amplitude: f64,

    /// Spacing between jitter anchors in minutes
    #[serde(default = "default_jitter_anchor_minutes")]
    pub jitter_anchor_minutes: u64,
}

fn default_jitter_amplitude() -> f64 {
    3.0
}

fn default_jitter_anchor_minutes() -> u64 {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            jitter_amplitude: default_jitter_amplitude(),
            jitter_anchor_minutes: default_jitter_anchor_minutes(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.jitter_amplitude.is_finite() || self.jitter_amplitude < 0.0 {
            return Err(CatalogError::InvalidConfig(format!(
                "jitter_amplitude must be a finite value >= 0, got {}",
                self.jitter_amplitude
            )));
        }
        if !(1..=60).contains(&self.jitter_anchor_minutes) {
            return Err(CatalogError::InvalidConfig(format!(
                "jitter_anchor_minutes must be within 1..=60, got {}",
                self.jitter_anchor_minutes
            )));
        }
        Ok(())
    }
}
