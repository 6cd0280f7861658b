//! The seam between the shell and a node.

use std::future::Future;

use serde_json::Value;

use crate::error::RpcError;

/// Something that can answer JSON-RPC calls.
///
/// The shell holds exactly one handle for its whole lifetime and calls it
/// one statement at a time. [`crate::NodeClient`] talks HTTP; tests use an
/// in-memory implementation.
pub trait RpcHandle {
    /// Issue `method` with `params` and return the call's `result`.
    fn request(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value, RpcError>> + Send;

    /// Human-readable location of the node, for logs and banners.
    fn endpoint(&self) -> &str;
}

impl<H: RpcHandle> RpcHandle for &H {
    fn request(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value, RpcError>> + Send {
        (**self).request(method, params)
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}
