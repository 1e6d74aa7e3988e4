//! Synthetic metrics CLI
//!
//! A command-line tool for sampling generated server metrics, inspecting
//! the incident cycle, and printing alert feeds and the scenario catalog.

mod commands;
mod config;
mod output;
mod timestamp;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{catalog, cycle, metrics};
use synth_lib::{Catalog, MetricsEngine, StructuredLogger};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Synthetic metrics CLI
#[derive(Parser)]
#[command(name = "synthmon")]
#[command(author, version, about = "Deterministic synthetic server metrics", long_about = None)]
pub struct Cli {
    /// Engine config file (TOML or JSON); SYNTH_* env vars override it
    #[arg(long, env = "SYNTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose logging on stderr
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one metric reading
    Sample {
        /// Server id (e.g. web-01)
        #[arg(long, short)]
        server: String,

        /// Server type; looked up in the fleet if omitted
        #[arg(long = "type", short = 't')]
        server_type: Option<String>,

        /// Metric (cpu, memory, disk, network)
        #[arg(long, short)]
        metric: String,

        /// RFC3339 time or epoch milliseconds (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Generate every metric for one server
    Snapshot {
        /// Server id (e.g. web-01)
        #[arg(long, short)]
        server: String,

        /// Server type; looked up in the fleet if omitted
        #[arg(long = "type", short = 't')]
        server_type: Option<String>,

        /// RFC3339 time or epoch milliseconds (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Generate a time series of one metric
    Series {
        /// Server id (e.g. web-01)
        #[arg(long, short)]
        server: String,

        /// Server type; looked up in the fleet if omitted
        #[arg(long = "type", short = 't')]
        server_type: Option<String>,

        /// Metric (cpu, memory, disk, network)
        #[arg(long, short)]
        metric: String,

        /// Series start, RFC3339 or epoch milliseconds (default: start of today)
        #[arg(long)]
        from: Option<String>,

        /// Length of the series in hours
        #[arg(long, default_value_t = 24)]
        hours: u64,

        /// Step between samples in minutes
        #[arg(long, default_value_t = 10)]
        step: u64,
    },

    /// Show the incident cycle state
    Cycle {
        /// RFC3339 time or epoch milliseconds (default: now)
        #[arg(long, conflicts_with_all = ["hour", "minute"])]
        at: Option<String>,

        /// Hour of day (0-23)
        #[arg(long, requires = "minute")]
        hour: Option<u32>,

        /// Minute of hour
        #[arg(long, requires = "hour")]
        minute: Option<u32>,
    },

    /// Show synthetic alerts
    Alerts {
        /// Limit to one server (default: whole fleet)
        #[arg(long, short)]
        server: Option<String>,

        /// Server type; looked up in the fleet if omitted
        #[arg(long = "type", short = 't', requires = "server")]
        server_type: Option<String>,

        /// RFC3339 time or epoch milliseconds (default: now)
        #[arg(long)]
        at: Option<String>,

        /// Emit the Alertmanager webhook payload instead
        #[arg(long)]
        alertmanager: bool,
    },

    /// Inspect the compiled-in catalog
    #[command(subcommand)]
    Catalog(CatalogCommands),
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Baseline ranges per server type
    Profiles,
    /// Incident scenarios and their windows
    Scenarios,
    /// Servers in the simulated fleet
    Servers,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let logger = StructuredLogger::new("synthmon");

    let engine_config = config::load(cli.config.as_deref())?;
    let engine = MetricsEngine::new(Catalog::builtin(), engine_config)
        .context("Invalid catalog or engine configuration")?;
    logger.log_catalog_loaded(engine.catalog());

    let result = match cli.command {
        Commands::Sample {
            server,
            server_type,
            metric,
            at,
        } => metrics::sample(&engine, &server, server_type, &metric, at, cli.format),
        Commands::Snapshot {
            server,
            server_type,
            at,
        } => metrics::snapshot(&engine, &server, server_type, at, cli.format),
        Commands::Series {
            server,
            server_type,
            metric,
            from,
            hours,
            step,
        } => {
            let request = metrics::SeriesRequest {
                server,
                server_type,
                metric,
                from,
                hours,
                step_minutes: step,
            };
            metrics::series(&engine, &logger, request, cli.format)
        }
        Commands::Cycle { at, hour, minute } => {
            cycle::show_cycle(&engine, at, hour.zip(minute), cli.format)
        }
        Commands::Alerts {
            server,
            server_type,
            at,
            alertmanager,
        } => cycle::show_alerts(
            &engine,
            &logger,
            server.map(|id| (id, server_type)),
            at,
            alertmanager,
            cli.format,
        ),
        Commands::Catalog(catalog_cmd) => match catalog_cmd {
            CatalogCommands::Profiles => catalog::show_profiles(&engine, cli.format),
            CatalogCommands::Scenarios => catalog::show_scenarios(&engine, cli.format),
            CatalogCommands::Servers => catalog::show_servers(&engine, cli.format),
        },
    };

    if let Err(ref err) = result {
        logger.log_rejected("command", &format!("{:#}", err));
    }
    result
}
