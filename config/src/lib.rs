//! Startup configuration for nodeshell.
//!
//! Turns the process arguments into an immutable [`EndpointConfig`]:
//! - `-file`, `-server`, `-timeout`, `-log-level`, `-config` and `-help` flags
//! - `NODESHELL_*` environment fallbacks
//! - an optional TOML config file
//!
//! Parsing is fail-fast: any unrecognized flag rejects the whole command line.

pub mod args;
pub mod endpoint;
pub mod error;
pub mod file;

pub use args::{configure, configure_with_env, Launch, ENV_LOG_LEVEL, ENV_SERVER, ENV_TIMEOUT};
pub use endpoint::{EndpointConfig, DEFAULT_LOG_LEVEL, DEFAULT_REMOTE_ADDRESS, DEFAULT_TIMEOUT_SECS};
pub use error::ConfigError;
pub use file::ConfigFile;
