//! Server configuration.
//!
//! Configuration is read from an optional `cursus.json` next to the server
//! (or wherever the CLI's `--config` flag points). Every field has a
//! default, so the file is only needed to override something; CLI flags in
//! turn override file values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "cursus.json";

/// Default path of the JSON document backing the catalog.
fn default_data_file() -> String {
    "data.json".to_string()
}

/// Default interface the HTTP server binds.
fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default port the HTTP server binds.
const fn default_port() -> u16 {
    8080
}

/// Main configuration for the catalog server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Path of the JSON document the catalog persists to.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Interface the HTTP server binds.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server binds.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `cursus.json` in the current directory. If found, loads and
    /// validates the configuration. If not found, returns default
    /// configuration.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            ConfigError::parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `cursus.json` in the given directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        Self::load_from_file(&config_path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration. If the
    /// file exists but cannot be read or parsed, returns an error.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// Defaults always pass; files and CLI overrides can produce empty
    /// strings, which are rejected here before the server starts.
    pub fn validate(&self) -> Result<()> {
        if self.data_file.trim().is_empty() {
            return Err(ConfigError::validation(
                "dataFile must not be empty",
                "Set dataFile to a writable path such as data.json in your cursus.json",
            ));
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "host must not be empty",
                "Set host to an interface such as 127.0.0.1 in your cursus.json",
            ));
        }

        Ok(())
    }
}
