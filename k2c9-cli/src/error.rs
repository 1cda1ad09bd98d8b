//! CLI error type.

use std::fmt;
use std::path::PathBuf;

use k2c9::config::ConfigError;
use k2c9::logging::LoggingError;
use k2c9::{FootprintError, QueryError};

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Reading, writing or editing the configuration failed.
    Config(String),
    /// Logging could not be initialized.
    Logging(LoggingError),
    /// The footprint could not be loaded.
    Footprint(FootprintError),
    /// A query was rejected or failed.
    Query(QueryError),
    /// Writing an output file failed.
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Footprint(e) => write!(f, "Footprint error: {}", e),
            CliError::Query(e) => f.write_str(&e.user_message()),
            CliError::Output { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Logging(e) => Some(e),
            CliError::Footprint(e) => Some(e),
            CliError::Query(e) => Some(e),
            CliError::Output { source, .. } => Some(source),
            CliError::Config(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<FootprintError> for CliError {
    fn from(e: FootprintError) -> Self {
        CliError::Footprint(e)
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        CliError::Query(e)
    }
}
