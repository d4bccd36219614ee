// Terminal UI utilities

use colored::Colorize;

use crate::services::BuildReport;

pub fn print_header(title: &str) {
    eprintln!();
    eprintln!(
        "{}",
        "╔════════════════════════════════════════════════════════════╗".bright_blue()
    );
    eprintln!("{}", format!("║  {:<58}║", title).bright_blue());
    eprintln!(
        "{}",
        "╚════════════════════════════════════════════════════════════╝".bright_blue()
    );
    eprintln!();
}

pub fn print_success(message: &str) {
    eprintln!("{}", format!("✅ {}", message).bright_green().bold());
}

pub fn print_error(message: &str) {
    eprintln!("{}", format!("❌ {}", message).bright_red().bold());
}

pub fn print_warning(message: &str) {
    eprintln!("{}", format!("⚠️  {}", message).bright_yellow());
}

/// Summary table of a finished pipeline run
pub fn print_report(report: &BuildReport) {
    eprintln!();
    for outcome in &report.outcomes {
        let status = if outcome.pushed {
            "pushed".bright_green()
        } else {
            "local".bright_yellow()
        };
        eprintln!(
            "  {:<20} {:<8} {}",
            outcome.service_name.bold(),
            status,
            outcome.image_reference
        );
    }
    for skipped in &report.skipped {
        eprintln!("  {:<20} {:<8}", skipped.bold(), "skipped".dimmed());
    }
    eprintln!();
}
