//! Configuration file support.
//!
//! Settings live in `~/.k2c9/config.ini`:
//!
//! ```ini
//! [footprint]
//! file = /path/to/footprint.json
//!
//! [plot]
//! width = 640
//! height = 480
//! format = png
//!
//! [output]
//! format = plain
//!
//! [logging]
//! level = info
//! directory = /var/log/k2c9
//! ```
//!
//! Missing files and missing keys fall back to defaults. Values are
//! validated through [`ConfigKey::set`] on load, so a file that loads is
//! always usable.

mod keys;

pub use keys::ConfigKey;

use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::format::OutputFormat;
use crate::logging::LoggingConfig;
use crate::render::{ImageEncoding, RenderConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Directory name under the home directory.
const CONFIG_DIR_NAME: &str = ".k2c9";

/// File name of the configuration file.
const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors from loading, saving or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl PartialEq for ConfigError {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

/// `[footprint]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FootprintSettings {
    /// Footprint geometry file; the built-in K2C9 footprint when unset.
    pub file: Option<PathBuf>,
}

/// `[plot]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    pub width: u32,
    pub height: u32,
    pub format: ImageEncoding,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            format: ImageEncoding::Png,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub footprint: FootprintSettings,
    pub plot: PlotSettings,
    pub output: OutputSettings,
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load from the default location, or defaults if the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, or defaults if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config = Self::from_ini(&ini)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }

    /// Renderer settings from the `[plot]` section.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::default()
            .with_size(self.plot.width, self.plot.height)
            .with_encoding(self.plot.format)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|props| props.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini
    }
}

/// Directory holding the configuration file.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Full path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.plot.width, 640);
        assert_eq!(config.plot.height, 480);
        assert_eq!(config.plot.format, ImageEncoding::Png);
        assert_eq!(config.output.format, OutputFormat::Plain);
        assert_eq!(config.logging.level, "info");
        assert!(config.footprint.file.is_none());
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with(".k2c9/config.ini"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[plot]\nwidth = 800\n\n[output]\nformat = csv\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.plot.width, 800);
        assert_eq!(config.plot.height, 480);
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_load_invalid_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[plot]\nformat = tiff\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "plot.format"));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        ConfigKey::PlotFormat.set(&mut config, "jpeg").unwrap();
        ConfigKey::LoggingDirectory
            .set(&mut config, "/tmp/k2c9-logs")
            .unwrap();
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[plot]"));
        assert!(!contents.contains("[footprint]"));

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_render_config() {
        let mut config = ConfigFile::default();
        config.plot.width = 1024;
        config.plot.format = ImageEncoding::Jpeg;

        let render = config.render_config();
        assert_eq!(render.width, 1024);
        assert_eq!(render.height, 480);
        assert_eq!(render.encoding, ImageEncoding::Jpeg);
    }
}
