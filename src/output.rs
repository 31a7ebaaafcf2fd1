//! Output formatting.
//!
//! Text mode streams one line per completed probe; JSON mode serializes
//! the finalized report. The engine itself performs no serialization.

use crate::scanner::{PortStatus, ProbeResult, ScanReport};
use console::{style, Style};
use std::io::{self, Write};

/// Print the text-mode column header.
pub fn print_header() {
    println!(
        "{:<8}{:<17}{:>6}  {}",
        style("METHOD").bold(),
        style("IP").bold(),
        style("PORT").bold(),
        style("STATUS").bold()
    );
}

/// Print one result line: `METHOD  IP  PORT  STATUS`.
pub fn print_result_line(result: &ProbeResult) {
    let status_style = match result.status {
        PortStatus::Open => Style::new().green().bold(),
        PortStatus::Closed => Style::new().red(),
        PortStatus::Filtered => Style::new().yellow(),
        PortStatus::OpenFiltered | PortStatus::ClosedFiltered => Style::new().yellow().dim(),
    };

    println!(
        "{:<8}{:<17}{:>6}  {}",
        result.method,
        result.ip,
        result.port,
        status_style.apply_to(result.status)
    );
}

/// Print the end-of-scan summary to stderr, keeping stdout clean for
/// the result lines.
pub fn print_summary(report: &ScanReport) {
    eprintln!(
        "\n{} {}/{} probes in {:.2}s: {} open, {} closed, {} filtered, {} ambiguous",
        style("Done:").bold(),
        report.results.len(),
        report.probes_planned,
        report.duration_ms as f64 / 1000.0,
        style(report.open).green().bold(),
        style(report.closed).red(),
        style(report.filtered).yellow(),
        style(report.ambiguous).yellow().dim(),
    );
    if report.cancelled {
        eprintln!("{} scan cancelled, report is partial", style("Note:").yellow().bold());
    }
}

/// Print the report as pretty JSON to stdout.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", json)
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}
