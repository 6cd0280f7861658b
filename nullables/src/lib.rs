//! Nullable infrastructure for deterministic testing.
//!
//! The shell only ever talks to a node through `RpcHandle`. This crate
//! provides an implementation that:
//! - Returns scripted values or failures per method
//! - Records every request for assertions
//! - Never touches the network
//!
//! Usage: hand a `NullNode` to the shell instead of a `NodeClient`.

pub mod node;

pub use node::NullNode;
