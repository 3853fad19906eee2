//! Operator-facing console lines: which node a transfer belongs to, per-node
//! failures and the final summary. Diagnostics go through `tracing` instead.

use colored::Colorize;
use snafu::ChainCompat;
use supports_color::Stream;

use crate::filesystem::Stub;
use crate::sync::SyncReport;

/// Colors are only emitted when the terminal claims to support them.
pub fn configure_colors() {
    let enabled = supports_color::on(Stream::Stdout).is_some();
    colored::control::set_override(enabled);
}

pub fn print_from_node(stub: &Stub, line: &str) {
    println!("{} {line}", format!("[{stub}]").cyan());
}

/// Joins an error and all of its sources into a single line.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    ChainCompat::new(error)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

pub fn print_failure(stub: &Stub, message: &str) {
    eprintln!("{} [{stub}] {message}", "failed".red().bold());
}

pub fn print_summary(report: &SyncReport) {
    if report.is_success() {
        println!("{} {}", "Sync complete:".green().bold(), summary_line(report));
    } else {
        for failure in report.failures() {
            eprintln!("  {} {}: {}", "-".red(), failure.stub, failure.message);
        }
        eprintln!(
            "{} {} entr{} failed to sync ({})",
            "Sync incomplete:".red().bold(),
            report.failure_count(),
            if report.failure_count() == 1 { "y" } else { "ies" },
            summary_line(report),
        );
    }
}

fn summary_line(report: &SyncReport) -> String {
    format!(
        "{} push(es): {} whole director{}, {} file(s) in {} batch(es); {} node(s) checked, {} skipped",
        report.pushes(),
        report.wholesale_pushes(),
        if report.wholesale_pushes() == 1 { "y" } else { "ies" },
        report.files_pushed(),
        report.batch_pushes(),
        report.nodes_visited(),
        report.nodes_skipped(),
    )
}
