//! Configuration loading for the CLI
//!
//! Layers an optional config file under `SYNTH_*` environment variables
//! and deserializes the result into the engine config.

use std::path::Path;

use anyhow::{Context, Result};
use synth_lib::EngineConfig;

/// Environment variable prefix (e.g. SYNTH_JITTER_AMPLITUDE)
const ENV_PREFIX: &str = "SYNTH";

/// Load engine configuration from an optional file and the environment
pub fn load(path: Option<&Path>) -> Result<EngineConfig> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            anyhow::bail!("Config file {} does not exist", path.display());
        }
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .context("Failed to read configuration")?;

    let engine: EngineConfig = settings
        .try_deserialize()
        .context("Failed to parse configuration")?;

    tracing::debug!(
        jitter_amplitude = engine.jitter_amplitude,
        jitter_anchor_minutes = engine.jitter_anchor_minutes,
        "Configuration loaded"
    );

    Ok(engine)
}
