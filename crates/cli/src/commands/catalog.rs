//! Catalog inspection commands

use anyhow::Result;
use synth_lib::{MetricType, MetricsEngine, ServerProfile};
use tabled::Tabled;

use crate::output::{self, OutputFormat};

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Server Type")]
    server_type: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Disk")]
    disk: String,
    #[tabled(rename = "Network")]
    network: String,
}

#[derive(Tabled)]
struct ScenarioRow {
    #[tabled(rename = "Slot")]
    slot: u8,
    #[tabled(rename = "Window")]
    window: String,
    #[tabled(rename = "Scenario")]
    name: String,
    #[tabled(rename = "Affected")]
    affected: String,
    #[tabled(rename = "Effects")]
    effects: String,
}

#[derive(Tabled)]
struct ServerRow {
    #[tabled(rename = "Server")]
    id: String,
    #[tabled(rename = "Type")]
    server_type: String,
}

fn range_cell(profile: &ServerProfile, metric: MetricType) -> String {
    profile
        .range(metric)
        .map(|r| format!("{:.0}-{:.0}", r.min, r.max))
        .unwrap_or_else(|| "-".to_string())
}

pub fn show_profiles(engine: &MetricsEngine<'_>, format: OutputFormat) -> Result<()> {
    let profiles: Vec<&ServerProfile> = engine.catalog().profiles().collect();

    match format {
        OutputFormat::Json => output::print_json(&profiles)?,
        OutputFormat::Table => {
            let rows: Vec<ProfileRow> = profiles
                .iter()
                .map(|p| ProfileRow {
                    server_type: p.server_type.to_string(),
                    cpu: range_cell(p, MetricType::Cpu),
                    memory: range_cell(p, MetricType::Memory),
                    disk: range_cell(p, MetricType::Disk),
                    network: range_cell(p, MetricType::Network),
                })
                .collect();
            output::print_table(rows, "No server profiles");
        }
    }

    Ok(())
}

pub fn show_scenarios(engine: &MetricsEngine<'_>, format: OutputFormat) -> Result<()> {
    let scenarios = engine.catalog().scenarios();

    match format {
        OutputFormat::Json => output::print_json(scenarios)?,
        OutputFormat::Table => {
            let rows: Vec<ScenarioRow> = scenarios
                .iter()
                .map(|s| ScenarioRow {
                    slot: s.time_slot,
                    window: s.window(),
                    name: s.name.clone(),
                    affected: s
                        .affected_servers
                        .iter()
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", "),
                    effects: s
                        .metric_effects
                        .iter()
                        .map(|(metric, effect)| {
                            format!("{} {}", metric, output::format_effect(*effect))
                        })
                        .collect::<Vec<_>>()
                        .join(", "),
                })
                .collect();
            output::print_table(rows, "No scenarios defined");
        }
    }

    Ok(())
}

pub fn show_servers(engine: &MetricsEngine<'_>, format: OutputFormat) -> Result<()> {
    let servers = engine.catalog().servers();

    match format {
        OutputFormat::Json => output::print_json(servers)?,
        OutputFormat::Table => {
            let rows: Vec<ServerRow> = servers
                .iter()
                .map(|s| ServerRow {
                    id: s.id.clone(),
                    server_type: s.server_type.to_string(),
                })
                .collect();
            output::print_table(rows, "No servers in the fleet");
        }
    }

    Ok(())
}
