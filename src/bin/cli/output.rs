//! Report rendering and display functions.

use std::path::Path;

use owo_colors::OwoColorize;

use pyshape::{Handle, PyshapeError, SuiteReport, Underlying};

/// Print a suite report as a coloured summary
pub fn print_report(report: &SuiteReport) {
    println!("{} {}", "Check suite:".bold(), report.suite.cyan());
    println!();

    for outcome in &report.outcomes {
        let marker = if outcome.passed {
            "PASS".green().bold().to_string()
        } else {
            "FAIL".red().bold().to_string()
        };
        println!("  {marker} {}: {}", outcome.id, outcome.message);
    }

    println!();
    let summary = format!(
        "{} passed, {} failed, {} skipped",
        report.passed, report.failed, report.skipped
    );
    if report.all_passed() {
        println!("{}", summary.bright_green());
    } else {
        println!("{}", summary.bright_red());
    }
}

/// Serialize the wrapped tree as pretty JSON; the empty handle is `null`.
pub fn tree_json(handle: &Handle) -> serde_json::Result<String> {
    match handle.underlying() {
        None => serde_json::to_string_pretty(&serde_json::Value::Null),
        Some(Underlying::Node(node)) => serde_json::to_string_pretty(node),
        Some(Underlying::Sequence(nodes)) => serde_json::to_string_pretty(nodes),
    }
}

/// Report a submission that failed to parse
pub fn print_parse_error(path: &Path, err: &PyshapeError) {
    eprintln!("{} {}", "Submission does not parse:".red().bold(), path.display());
    eprintln!("  {err}");
}
