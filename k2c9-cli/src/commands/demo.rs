//! Demo command - run a sample query through every output.

use console::style;
use k2c9::format::OutputFormat;
use k2c9::query::DEMO_QUERY;
use k2c9::QueryService;

use super::visibility::print_report;
use crate::error::CliError;

/// Run the demo command.
pub fn run(service: &QueryService) -> Result<(), CliError> {
    println!("{} {}", style("Query:").bold(), DEMO_QUERY);
    println!();

    println!("{}", style("Plain").bold());
    print!("{}", service.in_region(Some(DEMO_QUERY), None)?);
    println!();

    println!("{}", style("CSV").bold());
    print!(
        "{}",
        service.in_region(Some(DEMO_QUERY), Some(OutputFormat::Csv.name()))?
    );
    println!();

    println!("{}", style("Visibility").bold());
    let report = service.check_visibility(Some(DEMO_QUERY))?;
    print_report(&report, service.footprint_name());
    Ok(())
}
