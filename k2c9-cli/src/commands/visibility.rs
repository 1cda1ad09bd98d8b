//! Visibility command - per-position summary in both coordinate notations.

use console::style;
use k2c9::format::SummaryRow;
use k2c9::{QueryService, VisibilityReport};

use crate::error::CliError;

/// Run the visibility command.
pub fn run(service: &QueryService, pos: &str) -> Result<(), CliError> {
    let report = service.check_visibility(Some(pos))?;
    print_report(&report, service.footprint_name());
    Ok(())
}

/// Print a visibility report.
pub fn print_report(report: &VisibilityReport, footprint_name: &str) {
    let width = report
        .rows
        .iter()
        .map(|row| row.input.trim().len())
        .max()
        .unwrap_or(0);

    for row in &report.rows {
        println!(
            "  {:width$}  {}  {:>20}  {}",
            row.input.trim(),
            row.hmsdms,
            row.decimal,
            verdict(row),
            width = width
        );
    }

    println!();
    println!(
        "{} of {} position(s) inside the {} footprint",
        report.in_region_count(),
        report.rows.len(),
        footprint_name
    );
}

fn verdict(row: &SummaryRow) -> console::StyledObject<&'static str> {
    if row.in_region {
        style("inside").green().bold()
    } else {
        style("outside").red()
    }
}
