//! Subcommand implementations

pub mod catalog;
pub mod cycle;
pub mod metrics;

use anyhow::{Context, Result};
use synth_lib::{MetricsEngine, ServerType};

/// Resolve a server's type from `--type` or the fleet inventory
pub fn resolve_server_type(
    engine: &MetricsEngine<'_>,
    server: &str,
    server_type: Option<&str>,
) -> Result<ServerType> {
    match server_type {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid --type for server {}", server)),
        None => engine
            .resolve_server_type(server)
            .context("Pass --type for servers outside the built-in fleet"),
    }
}
