//! The resolved startup configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Address used when `-server` is not given.
pub const DEFAULT_REMOTE_ADDRESS: &str = "localhost:4444";

/// Per-statement timeout when `-timeout` is not given.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Log filter when neither `-log-level` nor `RUST_LOG` is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Everything the console needs to start. Built once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointConfig {
    /// `host:port` of the JSON-RPC endpoint, or a full `http(s)://` URL.
    pub remote_address: String,
    /// Script to run once in batch mode; `None` means interactive.
    pub script_path: Option<PathBuf>,
    /// Upper bound on a single statement's evaluation.
    pub request_timeout: Duration,
    pub log_level: String,
}

impl EndpointConfig {
    /// The URL requests are posted to.
    ///
    /// A bare `host:port` is reached over plain HTTP. When the port is
    /// omitted, the scheme's default port applies.
    pub fn endpoint_url(&self) -> String {
        if self.remote_address.contains("://") {
            self.remote_address.clone()
        } else {
            format!("http://{}", self.remote_address)
        }
    }

    pub fn is_batch(&self) -> bool {
        self.script_path.is_some()
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            remote_address: DEFAULT_REMOTE_ADDRESS.to_string(),
            script_path: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
