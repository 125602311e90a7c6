use crate::core::db::DEFAULT_DB_PATH;
use crate::core::{ManageDbError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

/// Database-related configuration.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file opened when none is given on the command line
    pub default_path: String,
    /// Open the default database at startup instead of waiting for the menu
    pub auto_open: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            default_path: DEFAULT_DB_PATH.to_string(),
            auto_open: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber` filter directive, e.g. "warn" or "managedb=debug"
    pub filter: Option<String>,
}

/// Location of the user configuration file, if the platform has a config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("managedb").join("config.toml"))
}

/// Loads configuration from a TOML file at the given path.
///
/// # Arguments
///
/// * `path` - The file path to the TOML configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ManageDbError::Config(e.to_string()))
}

/// Loads the user configuration file, falling back to defaults when it is absent
pub fn load_default_config() -> Result<Config> {
    match default_config_path() {
        Some(path) if path.exists() => load_config(path),
        _ => Ok(Config::default()),
    }
}
