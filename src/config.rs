//! Session configuration.
//!
//! Paths are always supplied explicitly, either from a JSON config file or
//! from a data root holding the benchmark and attribute directories.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{ATTR_DIR_NAME, DATASET_DIR_NAME, DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Everything an annotation session needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Directory containing one folder per sequence
    pub dataset_root: PathBuf,

    /// Directory where label files are written
    pub attr_root: PathBuf,

    /// Optional `<name> <first> <last>` frame-range file
    #[serde(default)]
    pub frame_range_file: Option<PathBuf>,

    /// Rows of the thumbnail grid
    #[serde(default = "default_grid_rows")]
    pub grid_rows: usize,

    /// Columns of the thumbnail grid
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_grid_rows() -> usize {
    DEFAULT_GRID_ROWS
}

fn default_grid_columns() -> usize {
    DEFAULT_GRID_COLUMNS
}

impl SessionConfig {
    /// Configuration with explicit dataset and label directories.
    pub fn new(dataset_root: impl Into<PathBuf>, attr_root: impl Into<PathBuf>) -> Self {
        Self {
            version: CONFIG_VERSION,
            dataset_root: dataset_root.into(),
            attr_root: attr_root.into(),
            frame_range_file: None,
            grid_rows: default_grid_rows(),
            grid_columns: default_grid_columns(),
            log_level: LogLevel::default(),
        }
    }

    /// Configuration for a data root holding `benchmarkDatasets/` and the
    /// attribute directory side by side.
    pub fn from_data_root(data_root: &Path) -> Self {
        Self::new(
            data_root.join(DATASET_DIR_NAME),
            data_root.join(ATTR_DIR_NAME),
        )
    }

    pub fn with_frame_range_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.frame_range_file = Some(path.into());
        self
    }

    pub fn with_grid(mut self, rows: usize, columns: usize) -> Self {
        self.grid_rows = rows;
        self.grid_columns = columns;
        self
    }

    /// Frames shown per page.
    pub fn page_size(&self) -> usize {
        self.grid_rows * self.grid_columns
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_rows == 0 || self.grid_columns == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have at least one row and column (got {}x{})",
                self.grid_rows, self.grid_columns
            )));
        }
        Ok(())
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config or the frame-range file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Value outside its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let json = r#"{ "version": 1, "dataset_root": "/data/otb", "attr_root": "/data/attr" }"#;
        let config = SessionConfig::from_json(json).unwrap();

        assert_eq!(config.page_size(), 9);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.frame_range_file, None);
    }

    #[test]
    fn test_newer_version_rejected() {
        let json = r#"{ "version": 99, "dataset_root": "a", "attr_root": "b" }"#;
        assert!(matches!(
            SessionConfig::from_json(json),
            Err(ConfigError::VersionTooNew { file_version: 99, .. })
        ));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let json = r#"{ "version": 1, "dataset_root": "a", "attr_root": "b", "grid_rows": 0 }"#;
        assert!(matches!(
            SessionConfig::from_json(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SessionConfig::from_data_root(Path::new("/data/otb"))
            .with_grid(2, 4)
            .with_frame_range_file("/data/otb/ranges.txt");
        let parsed = SessionConfig::from_json(&config.to_json().unwrap()).unwrap();

        assert_eq!(parsed, config);
        assert_eq!(
            parsed.dataset_root,
            Path::new("/data/otb").join("benchmarkDatasets")
        );
        assert_eq!(parsed.page_size(), 8);
    }

    #[test]
    fn test_log_level_lowercase() {
        let level: LogLevel = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level, LogLevel::Debug);
        assert_eq!(level.to_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_log_level_value_names() {
        use clap::ValueEnum;

        assert_eq!(LogLevel::from_str("trace", true), Ok(LogLevel::Trace));
        assert_eq!(LogLevel::from_str("WARN", true), Ok(LogLevel::Warn));
        assert!(LogLevel::from_str("loud", true).is_err());
    }
}
