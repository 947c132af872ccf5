//! Transport layer for the RPC client
//!
//! The engine itself never touches the network; a `Transport` supplied by
//! the caller performs the single request/response exchange per call.

use async_trait::async_trait;
use serde_json::Value;

use kite_json_rpc::Context;

use crate::error::RpcResult;

pub mod http;

// Re-export transport implementations
pub use http::HttpTransport;

/// The wire exchange contract.
///
/// `send` must return `None` as the raw response exactly when
/// `without_response` is true (notifications), and the server's decoded
/// payload otherwise. The returned `Context` carries transport metadata
/// (status, headers) back to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to the server. Must precede any `send`.
    async fn connect(&mut self) -> RpcResult<()>;

    /// Disconnect from the server. Runs on all exit paths when the client
    /// is used as a scoped session.
    async fn disconnect(&mut self) -> RpcResult<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Perform one request/response exchange.
    async fn send(
        &mut self,
        payload: Value,
        without_response: bool,
        context: &Context,
    ) -> RpcResult<(Option<Value>, Context)>;
}

/// Type alias for a boxed transport
pub type BoxedTransport = Box<dyn Transport>;
