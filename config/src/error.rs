use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("missing value for option {0}")]
    MissingValue(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("cannot read config file {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
