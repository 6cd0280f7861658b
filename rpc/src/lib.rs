//! JSON-RPC client for nodeshell.
//!
//! - [`RpcHandle`]: the one operation the shell needs from a node
//! - [`NodeClient`]: the HTTP implementation backed by `reqwest`
//! - [`protocol`]: JSON-RPC 2.0 request/response envelopes
//! - [`methods`]: names of the node methods the shell knows about

pub mod client;
pub mod error;
pub mod handle;
pub mod methods;
pub mod protocol;

pub use client::NodeClient;
pub use error::RpcError;
pub use handle::RpcHandle;
