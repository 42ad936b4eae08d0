//! Human-readable and JSON rendering of sync reports

use colored::Colorize;
use theme_core::{SectionStatus, SyncReport};

use crate::context::ThemeContext;
use crate::error::Result;

/// Print `report` as pretty JSON on stdout
pub fn print_json(report: &SyncReport) -> Result<()> {
    println!("{}", report.to_json()?);
    Ok(())
}

/// Print one line per section, followed by its warnings
pub fn print_report(report: &SyncReport, context: &ThemeContext) {
    if report.throttled {
        println!("{} Change ignored during cooldown", "SKIP".dimmed());
        return;
    }

    for path in &report.ignored {
        tracing::debug!(path = %path, "Ignored change");
    }

    for section in &report.sections {
        let path = context.display_path(&section.path);
        match &section.status {
            SectionStatus::Updated => println!("{} {}", "UPDATED".green().bold(), path),
            SectionStatus::WouldUpdate => println!("{} {}", "OUTDATED".yellow().bold(), path),
            SectionStatus::Unchanged => println!("{} {}", "OK".green(), path.dimmed()),
            SectionStatus::Failed { reason } => {
                println!("{} {}", "ERROR".red().bold(), path);
                println!("   {} {}", "!".red(), reason);
            }
        }
        for warning in &section.warnings {
            println!("   {} {}", "WARN".yellow(), warning);
        }
    }

    for error in &report.errors {
        println!("{} {}", "ERROR".red().bold(), error);
    }
}

/// One-line summary of a finished report
pub fn summary(report: &SyncReport) -> String {
    let changed = report.changed().count();
    let failed = report.failed().count();
    let warnings = report.warnings().count();
    format!(
        "{} section(s), {} changed, {} failed, {} warning(s)",
        report.sections.len(),
        changed,
        failed,
        warnings
    )
}
