//! Optional TOML config file.
//!
//! ```toml
//! server = "127.0.0.1:8545"
//! timeout_secs = 10
//! log_level = "info"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings read from `-config <path>`. Every key is optional; flags and
/// environment variables override whatever the file sets.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub server: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
