//! Server Configuration
//!
//! Layered: built-in defaults, then an optional config file, then the process
//! environment (`SERVER_ADDR`, `FILE_PATH_VEHICLES_JSON`, `LOG_LEVEL`, `LOG_FORMAT`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "VEHICLES_CONFIG";

/// Config file looked up when `VEHICLES_CONFIG` is unset (any supported extension)
const DEFAULT_CONFIG_FILE: &str = "vehicles";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub server_addr: String,
    /// JSON file the store is seeded from
    #[serde(rename = "file_path_vehicles_json")]
    pub vehicles_file: PathBuf,
    /// Max tracing level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the config file and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::from_sources(&file, Environment::default())
    }

    fn from_sources(file: &str, env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server_addr", "0.0.0.0:8080")?
            .set_default("log_level", "info")?
            .set_default("log_format", "pretty")?
            .add_source(File::with_name(file).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}
