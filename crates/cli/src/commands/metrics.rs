//! Metric sampling commands

use anyhow::{Context, Result};
use colored::Colorize;
use synth_lib::time_bucket::{HOUR_MS, MINUTE_MS};
use synth_lib::{MetricType, MetricsEngine, StructuredLogger};
use tabled::Tabled;

use super::resolve_server_type;
use crate::output::{self, OutputFormat};
use crate::timestamp;

#[derive(Tabled)]
struct SampleRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Baseline")]
    baseline: String,
}

fn parse_metric(raw: &str) -> Result<MetricType> {
    raw.parse::<MetricType>()
        .context("Expected one of: cpu, memory, disk, network")
}

/// Generate one reading
pub fn sample(
    engine: &MetricsEngine<'_>,
    server: &str,
    server_type: Option<String>,
    metric: &str,
    at: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let server_type = resolve_server_type(engine, server, server_type.as_deref())?;
    let metric = parse_metric(metric)?;
    let ts = timestamp::parse_or_now(at.as_deref())?;

    let sample = engine.sample(server, server_type, metric, ts);

    match format {
        OutputFormat::Json => output::print_json(&sample)?,
        OutputFormat::Table => {
            println!(
                "{} {} {} = {}",
                timestamp::format(sample.timestamp).dimmed(),
                sample.server_id.bold(),
                sample.metric,
                output::color_value(sample.value)
            );
        }
    }

    Ok(())
}

/// Generate every metric for one server
pub fn snapshot(
    engine: &MetricsEngine<'_>,
    server: &str,
    server_type: Option<String>,
    at: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let server_type = resolve_server_type(engine, server, server_type.as_deref())?;
    let ts = timestamp::parse_or_now(at.as_deref())?;

    let snapshot = engine.snapshot(server, server_type, ts);

    match format {
        OutputFormat::Json => output::print_json(&snapshot)?,
        OutputFormat::Table => {
            output::print_header(&format!(
                "{} ({}) at {}",
                snapshot.server_id,
                snapshot.server_type,
                timestamp::format(snapshot.timestamp)
            ));
            let scenario = snapshot.scenario.as_deref().unwrap_or("-");
            let impact = if snapshot.affected {
                "affected".red().to_string()
            } else {
                "unaffected".green().to_string()
            };
            println!(
                "Phase: {}  Scenario: {}  ({})",
                output::color_phase(snapshot.phase),
                scenario,
                impact
            );
            println!();

            let rows: Vec<MetricRow> = snapshot
                .values
                .iter()
                .map(|(metric, value)| MetricRow {
                    metric: metric.to_string(),
                    value: output::color_value(*value),
                    baseline: output::format_percent(engine.baseline(
                        &snapshot.server_id,
                        snapshot.server_type,
                        *metric,
                        snapshot.timestamp,
                    )),
                })
                .collect();
            output::print_table(rows, "No metrics generated");
        }
    }

    Ok(())
}

/// Arguments for the `series` command
pub struct SeriesRequest {
    pub server: String,
    pub server_type: Option<String>,
    pub metric: String,
    pub from: Option<String>,
    pub hours: u64,
    pub step_minutes: u64,
}

/// Generate a time series of one metric
pub fn series(
    engine: &MetricsEngine<'_>,
    logger: &StructuredLogger,
    request: SeriesRequest,
    format: OutputFormat,
) -> Result<()> {
    let server_type =
        resolve_server_type(engine, &request.server, request.server_type.as_deref())?;
    let metric = parse_metric(&request.metric)?;

    let start = match request.from.as_deref() {
        Some(raw) => timestamp::parse(raw)?,
        None => timestamp::start_of_day(timestamp::now()?),
    };
    let span = request
        .hours
        .checked_mul(HOUR_MS)
        .context("--hours is too large")?;
    let end = start.checked_add(span).context("--hours is too large")?;
    let step = request
        .step_minutes
        .checked_mul(MINUTE_MS)
        .context("--step is too large")?;

    let samples = engine
        .series(&request.server, server_type, metric, start, end, step)
        .context("Failed to generate series")?;
    logger.log_series_generated(&request.server, metric, start, end, samples.len());

    match format {
        OutputFormat::Json => output::print_json(&samples)?,
        OutputFormat::Table => {
            output::print_header(&format!(
                "{} {} every {} min",
                request.server, metric, request.step_minutes
            ));
            let rows: Vec<SampleRow> = samples
                .iter()
                .map(|s| SampleRow {
                    time: timestamp::format(s.timestamp),
                    value: output::color_value(s.value),
                })
                .collect();
            output::print_table(rows, "Empty time range");
        }
    }

    Ok(())
}
