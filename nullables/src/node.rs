//! Nullable node: scripted answers, recorded requests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use nodeshell_rpc::{RpcError, RpcHandle};
use serde_json::Value;

/// An in-memory node that answers from a script instead of the network.
///
/// Methods without a scripted answer fail with "method not found", like a
/// real node would.
pub struct NullNode {
    answers: Mutex<HashMap<String, Result<Value, RpcError>>>,
    requests: Mutex<Vec<(String, Value)>>,
    latency: Option<Duration>,
}

impl NullNode {
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            latency: None,
        }
    }

    /// Delay every answer, e.g. to exercise statement timeouts.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Answer `method` with `result` from now on.
    pub fn respond(&self, method: &str, result: Value) -> &Self {
        self.answers
            .lock()
            .unwrap()
            .insert(method.to_string(), Ok(result));
        self
    }

    /// Fail `method` with `error` from now on.
    pub fn fail(&self, method: &str, error: RpcError) -> &Self {
        self.answers
            .lock()
            .unwrap()
            .insert(method.to_string(), Err(error));
        self
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    /// Methods called so far, oldest first.
    pub fn methods(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    /// Clear recorded requests and scripted answers.
    pub fn reset(&self) {
        self.answers.lock().unwrap().clear();
        self.requests.lock().unwrap().clear();
    }

    fn answer(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.requests
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        self.answers
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .unwrap_or_else(|| Err(RpcError::method_not_found(method)))
    }
}

impl Default for NullNode {
    fn default() -> Self {
        Self::new()
    }
}

impl RpcHandle for NullNode {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.answer(method, params)
    }

    fn endpoint(&self) -> &str {
        "null://node"
    }
}
