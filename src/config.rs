use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("Failed to encode configuration: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Configuration for the log parser CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Input file configuration
    pub input: InputConfig,
    /// Result file configuration
    pub output: OutputConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Input file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// File extensions accepted for parsing (without the dot)
    pub allowed_extensions: Vec<String>,
}

/// Result file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory parsed CSV results are written to
    pub results_dir: PathBuf,
    /// Number of rows included in the printed job summary
    pub preview_rows: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level: "error", "warn", "info", "debug" or "trace"
    pub level: String,
}

impl LoggingConfig {
    /// Level filter for env_logger; unrecognised names fall back to info
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: InputConfig {
                allowed_extensions: vec![
                    "txt".to_string(),
                    "log".to_string(),
                    "csv".to_string(),
                ],
            },
            output: OutputConfig {
                results_dir: PathBuf::from("results"),
                preview_rows: 10,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_round_trips_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fortilog.toml");

        let config = Config::default();
        config.to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.input.allowed_extensions, vec!["txt", "log", "csv"]);
        assert_eq!(loaded.output.results_dir, PathBuf::from("results"));
        assert_eq!(loaded.output.preview_rows, 10);
        assert_eq!(loaded.logging.level, "info");
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[input\nallowed_extensions = ").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ConfigError::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = PathBuf::from("/nonexistent/fortilog.toml");
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_level_filter() {
        let mut logging = LoggingConfig { level: "debug".to_string() };
        assert_eq!(logging.level_filter(), log::LevelFilter::Debug);

        logging.level = "loud".to_string();
        assert_eq!(logging.level_filter(), log::LevelFilter::Info);
    }
}
