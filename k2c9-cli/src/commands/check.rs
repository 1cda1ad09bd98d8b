//! Check command - membership of each position as plain or CSV text.

use k2c9::config::ConfigFile;
use k2c9::QueryService;

use super::common::{resolve_output_format, FormatArg};
use crate::error::CliError;

/// Run the check command.
pub fn run(
    service: &QueryService,
    config: &ConfigFile,
    pos: &str,
    format: Option<FormatArg>,
) -> Result<(), CliError> {
    let format = resolve_output_format(format, config);
    let text = service.in_region(Some(pos), Some(format.name()))?;

    // lines already end in CRLF
    print!("{}", text);
    Ok(())
}
