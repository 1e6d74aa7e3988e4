//! Incident cycle and alert commands

use anyhow::{Context, Result};
use colored::Colorize;
use synth_lib::{Alert, AlertmanagerPayload, MetricsEngine, StructuredLogger, TimeOfDay};
use tabled::Tabled;

use super::resolve_server_type;
use crate::output::{self, OutputFormat};
use crate::timestamp;

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "Type")]
    server_type: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Scenario")]
    scenario: String,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&Alert> for AlertRow {
    fn from(alert: &Alert) -> Self {
        Self {
            server: alert.server_id.clone(),
            server_type: alert.server_type.to_string(),
            severity: output::color_severity(alert.severity),
            scenario: alert.scenario.clone(),
            phase: output::color_phase(alert.phase),
            message: alert.message.clone(),
        }
    }
}

/// Show the cycle state for a time of day or timestamp
pub fn show_cycle(
    engine: &MetricsEngine<'_>,
    at: Option<String>,
    time: Option<(u32, u32)>,
    format: OutputFormat,
) -> Result<()> {
    let info = match time {
        Some((hour, minute)) => {
            let time = TimeOfDay::new(hour, minute).context("Invalid --hour/--minute")?;
            engine.cycle_info_at(time)
        }
        None => engine.cycle_info(timestamp::parse_or_now(at.as_deref())?),
    };

    match format {
        OutputFormat::Json => output::print_json(&info)?,
        OutputFormat::Table => {
            output::print_header(&format!("Incident cycle at {}", info.time_of_day));
            println!("Time slot:   {}", info.time_slot);
            match info.scenario {
                Some(scenario) => println!(
                    "Scenario:    {} ({})",
                    scenario.name.bold(),
                    scenario.window()
                ),
                None => println!("Scenario:    -"),
            }
            println!("Phase:       {}", output::color_phase(info.phase));
            println!("Intensity:   {:.2}", info.intensity);
            println!("Progress:    {:.1}%", info.progress * 100.0);
            println!("Description: {}", info.description);
            if let Some(resolution) = &info.expected_resolution {
                println!("Resolution:  {}", resolution);
            }
            if let Some(scenario) = info.scenario {
                let affected: Vec<&str> =
                    scenario.affected_servers.iter().map(String::as_str).collect();
                println!("Affected:    {}", affected.join(", "));
            }
        }
    }

    Ok(())
}

/// Show alerts for one server or the whole fleet
pub fn show_alerts(
    engine: &MetricsEngine<'_>,
    logger: &StructuredLogger,
    target: Option<(String, Option<String>)>,
    at: Option<String>,
    alertmanager: bool,
    format: OutputFormat,
) -> Result<()> {
    let ts = timestamp::parse_or_now(at.as_deref())?;

    let alerts = match target {
        Some((server, server_type)) => {
            let server_type = resolve_server_type(engine, &server, server_type.as_deref())?;
            engine.alerts(&server, server_type, ts)
        }
        None => engine.fleet_alerts(ts),
    };

    for alert in &alerts {
        logger.log_alert(alert);
    }

    if alertmanager {
        return output::print_json(&AlertmanagerPayload::from_alerts(&alerts));
    }

    match format {
        OutputFormat::Json => output::print_json(&alerts)?,
        OutputFormat::Table => {
            output::print_header(&format!("Alerts at {}", timestamp::format(ts)));
            let rows: Vec<AlertRow> = alerts.iter().map(AlertRow::from).collect();
            output::print_table(rows, "No active alerts");
        }
    }

    Ok(())
}
