//! # JSON-RPC 2.0 Client
//!
//! A transport-agnostic JSON-RPC 2.0 client built on the
//! [`kite_json_rpc`] protocol model. The client composes requests, sends
//! them through an injected [`Transport`], and maps responses back to typed
//! results, including batch responses that arrive out of order, partially
//! missing, or with duplicate ids.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kite_rpc_client::{RpcClient, transport::HttpTransport};
//! use kite_json_rpc::RequestParams;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new("http://localhost:8080/rpc")?;
//!     let client = RpcClient::builder()
//!         .with_transport(Box::new(transport))
//!         .build()?;
//!
//!     client.connect().await?;
//!
//!     let sum = client
//!         .call("sum", RequestParams::positional(vec![json!(2), json!(3)]))
//!         .await?;
//!     println!("sum: {}", sum);
//!
//!     client.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Batches
//!
//! [`RpcClient::batch`] correlates responses back to the entries in entry
//! order, surviving servers that reorder, drop or duplicate responses;
//! [`RpcClient::batch_unordered`] returns the raw values in wire order
//! instead.

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod serializer;
pub mod transport;

// Re-export main types
pub use batch::BatchCall;
pub use client::{generate_id, RpcClient, RpcClientBuilder};
pub use config::ClientConfig;
pub use error::{RpcClientError, RpcResult, TransportError};
pub use serializer::{JsonSerializer, Serializer};
pub use transport::{BoxedTransport, Transport};

// Re-export protocol types for convenience
pub use kite_json_rpc::*;
