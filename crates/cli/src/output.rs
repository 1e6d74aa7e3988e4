//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use synth_lib::{AlertSeverity, Phase};
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print rows as a rounded table, or a notice when empty
pub fn print_table<T: Tabled>(rows: Vec<T>, empty_message: &str) {
    if rows.is_empty() {
        print_warning(empty_message);
        return;
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print a bold section header
pub fn print_header(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(50));
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Format a percentage reading
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Format a signed percentage-point effect
pub fn format_effect(value: f64) -> String {
    format!("{:+.0}", value)
}

/// Color a reading by how loaded it is
pub fn color_value(value: f64) -> String {
    let formatted = format_percent(value);
    if value >= 90.0 {
        formatted.red().bold().to_string()
    } else if value >= 75.0 {
        formatted.yellow().to_string()
    } else {
        formatted.green().to_string()
    }
}

/// Color a phase name
pub fn color_phase(phase: Phase) -> String {
    let name = phase.as_str();
    match phase {
        Phase::Normal | Phase::Resolved => name.green().to_string(),
        Phase::Incident => name.yellow().to_string(),
        Phase::Peak => name.red().bold().to_string(),
        Phase::Resolving => name.blue().to_string(),
    }
}

/// Color an alert severity
pub fn color_severity(severity: AlertSeverity) -> String {
    let name = severity.to_string();
    match severity {
        AlertSeverity::Info => name.blue().to_string(),
        AlertSeverity::Warning => name.yellow().to_string(),
        AlertSeverity::Critical => name.red().bold().to_string(),
    }
}
