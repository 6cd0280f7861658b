//! RPC error types.

use thiserror::Error;

/// JSON-RPC 2.0 code for an unknown method.
pub const METHOD_NOT_FOUND: i64 = -32601;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RpcError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("node returned HTTP {0}")]
    Http(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("node error {code}: {message}")]
    Remote { code: i64, message: String },
}

impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        RpcError::Remote {
            code: METHOD_NOT_FOUND,
            message: format!("the method {method} does not exist/is not available"),
        }
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RpcError::Timeout(e.to_string())
        } else if e.is_connect() {
            RpcError::Unreachable(e.to_string())
        } else if e.is_decode() {
            RpcError::InvalidResponse(e.to_string())
        } else {
            RpcError::Client(e.to_string())
        }
    }
}
