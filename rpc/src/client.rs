//! HTTP JSON-RPC client for a node.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;

use crate::error::RpcError;
use crate::handle::RpcHandle;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};

/// Upper bound on establishing the TCP connection.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a node's JSON-RPC endpoint.
///
/// Wraps `reqwest::Client` with the endpoint URL. Request ids increase
/// monotonically per client.
pub struct NodeClient {
    http: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl NodeClient {
    /// Create a client posting to `endpoint` (e.g. `http://127.0.0.1:4444`).
    ///
    /// `timeout` bounds each request from connect to the end of the body.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let endpoint = endpoint.into();
        let url = reqwest::Url::parse(&endpoint)
            .map_err(|e| RpcError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(RpcError::InvalidEndpoint(format!(
                "{endpoint}: expected an http(s) URL with a host"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(DEFAULT_CONNECT_TIMEOUT))
            .build()
            .map_err(|e| RpcError::Client(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            next_id: AtomicU64::new(1),
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &JsonRpcRequest) -> Result<Value, RpcError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        let parsed = serde_json::from_slice::<JsonRpcResponse>(&body);

        // Some nodes answer method errors with a non-2xx status and a
        // regular error envelope; prefer the envelope when there is one.
        if !status.is_success() {
            return match parsed {
                Ok(envelope) if envelope.error.is_some() => envelope.into_result(),
                _ => Err(RpcError::Http(status.as_u16())),
            };
        }

        parsed
            .map_err(|e| RpcError::InvalidResponse(format!("malformed JSON-RPC response: {e}")))?
            .into_result()
    }
}

impl RpcHandle for NodeClient {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(method, params, id);
        tracing::debug!(method, id, endpoint = %self.endpoint, "sending request");

        let result = self.post(&request).await;
        if let Err(ref e) = result {
            tracing::debug!(method, id, error = %e, "request failed");
        }
        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
