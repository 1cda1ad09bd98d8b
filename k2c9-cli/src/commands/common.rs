//! Common types and utilities shared across CLI commands.

use std::path::Path;

use clap::ValueEnum;
use k2c9::config::ConfigFile;
use k2c9::footprint;
use k2c9::format::OutputFormat;
use k2c9::render::ImageEncoding;
use k2c9::QueryService;
use tracing::debug;

use crate::error::CliError;

/// Text layout selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum FormatArg {
    /// One yes/no line per position
    Plain,
    /// Header plus one `position,yes|no` row per position
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Plain => OutputFormat::Plain,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

/// Image format selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ImageFormatArg {
    /// Lossless PNG
    Png,
    /// JPEG
    Jpeg,
}

impl From<ImageFormatArg> for ImageEncoding {
    fn from(arg: ImageFormatArg) -> Self {
        match arg {
            ImageFormatArg::Png => ImageEncoding::Png,
            ImageFormatArg::Jpeg => ImageEncoding::Jpeg,
        }
    }
}

/// Resolve the output format: CLI takes precedence, then config.
pub fn resolve_output_format(cli_format: Option<FormatArg>, config: &ConfigFile) -> OutputFormat {
    cli_format
        .map(OutputFormat::from)
        .unwrap_or(config.output.format)
}

/// Build a query service from CLI args and config.
///
/// `--footprint` overrides `footprint.file`; with neither, the built-in
/// K2C9 footprint is used.
pub fn build_service(
    cli_footprint: Option<&Path>,
    config: &ConfigFile,
    image_format: Option<ImageFormatArg>,
) -> Result<QueryService, CliError> {
    let path = cli_footprint.or(config.footprint.file.as_deref());
    let footprint = footprint::load(path)?;

    let mut render_config = config.render_config();
    if let Some(format) = image_format {
        render_config = render_config.with_encoding(format.into());
    }

    debug!(footprint = ?path, ?render_config, "Query service ready");
    Ok(QueryService::new(footprint, render_config))
}
