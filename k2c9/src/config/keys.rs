//! Typed configuration keys.
//!
//! Every setting in `config.ini` has a `ConfigKey`. Keys know their section,
//! how to read their value out of a [`ConfigFile`] as a string, and how to
//! validate and write a string back. Loading, saving and the CLI `config`
//! commands all go through these two operations.

use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};

/// A single configuration setting, addressed as `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    FootprintFile,
    PlotWidth,
    PlotHeight,
    PlotFormat,
    OutputFormat,
    LoggingLevel,
    LoggingDirectory,
}

/// Accepted `logging.level` values.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl ConfigKey {
    /// All keys in display order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::FootprintFile,
            ConfigKey::PlotWidth,
            ConfigKey::PlotHeight,
            ConfigKey::PlotFormat,
            ConfigKey::OutputFormat,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingDirectory,
        ]
    }

    /// INI section.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::FootprintFile => "footprint",
            ConfigKey::PlotWidth | ConfigKey::PlotHeight | ConfigKey::PlotFormat => "plot",
            ConfigKey::OutputFormat => "output",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    /// Key within the section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::FootprintFile => "file",
            ConfigKey::PlotWidth => "width",
            ConfigKey::PlotHeight => "height",
            ConfigKey::PlotFormat => "format",
            ConfigKey::OutputFormat => "format",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        fn path_or_empty(path: &Option<PathBuf>) -> String {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        }

        match self {
            ConfigKey::FootprintFile => path_or_empty(&config.footprint.file),
            ConfigKey::PlotWidth => config.plot.width.to_string(),
            ConfigKey::PlotHeight => config.plot.height.to_string(),
            ConfigKey::PlotFormat => config.plot.format.to_string(),
            ConfigKey::OutputFormat => config.output.format.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => path_or_empty(&config.logging.directory),
        }
    }

    /// Validate `value` and store it. An empty value clears optional paths.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason,
        };

        match self {
            ConfigKey::FootprintFile => {
                config.footprint.file = optional_path(value);
            }
            ConfigKey::PlotWidth => {
                config.plot.width = parse_dimension(value).map_err(invalid)?;
            }
            ConfigKey::PlotHeight => {
                config.plot.height = parse_dimension(value).map_err(invalid)?;
            }
            ConfigKey::PlotFormat => {
                config.plot.format = value.parse().map_err(invalid)?;
            }
            ConfigKey::OutputFormat => {
                config.output.format = value.parse().map_err(invalid)?;
            }
            ConfigKey::LoggingLevel => {
                let level = value.to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(invalid(format!("expected one of {}", LOG_LEVELS.join(", "))));
                }
                config.logging.level = level;
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = optional_path(value);
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn parse_dimension(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(v) if (100..=8192).contains(&v) => Ok(v),
        Ok(v) => Err(format!("{} is outside 100..=8192 pixels", v)),
        Err(_) => Err("not a whole number of pixels".to_string()),
    }
}
