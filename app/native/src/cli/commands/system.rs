//! Capability report and raw shell commands.

use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::context::CliContext;
use crate::cli::output::{print_json, provider_cell, root_cell};
use crate::error::CarrotError;
use crate::platform::CapabilityReport;

#[derive(Tabled)]
struct CapabilityRow {
    #[tabled(rename = "Capability")]
    capability: &'static str,
    #[tabled(rename = "Provider")]
    provider: String,
}

fn render_report(report: &CapabilityReport) -> String {
    let rows = vec![
        CapabilityRow { capability: "display", provider: provider_cell(report.display) },
        CapabilityRow { capability: "input", provider: provider_cell(report.input) },
        CapabilityRow { capability: "tasks", provider: provider_cell(report.tasks) },
        CapabilityRow { capability: "root", provider: root_cell(report.root) },
    ];
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Prints which provider serves each capability.
///
/// # Errors
///
/// Returns an error if the report could not be serialized.
pub fn execute_caps(json: bool) -> Result<(), CarrotError> {
    let ctx = CliContext::new();
    let report = ctx.capabilities().report;

    if json {
        print_json(&serde_json::to_value(report)?);
    } else {
        println!("{}", "Capabilities".bold());
        println!("{}", render_report(&report));
    }
    Ok(())
}

/// Runs a command through the elevated shell and prints its output.
///
/// # Errors
///
/// Returns an error if no elevated shell is available or the command exits
/// non-zero.
pub fn execute_exec(command: &[String]) -> Result<(), CarrotError> {
    let line = command.join(" ");
    if line.trim().is_empty() {
        return Err(CarrotError::InvalidArguments("empty command".to_string()));
    }

    let ctx = CliContext::new();
    let result = ctx.shell().execute(&line)?;

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    if !result.error.is_empty() {
        eprintln!("{}", result.error.dimmed());
    }

    if result.success {
        Ok(())
    } else {
        Err(CarrotError::ShellError(format!(
            "`{line}` exited with {}",
            result.exit_code.map_or_else(|| "a signal".to_string(), |code| format!("status {code}"))
        )))
    }
}
