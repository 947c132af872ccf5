//! # RPC Client Prelude
//!
//! Convenient re-exports of the most commonly used types and traits.
//!
//! ```rust
//! use kite_rpc_client::prelude::*;
//! ```

// Core client types
pub use crate::batch::BatchCall;
pub use crate::client::{generate_id, RpcClient, RpcClientBuilder};
pub use crate::config::ClientConfig;
pub use crate::error::{RpcClientError, RpcResult, TransportError};
pub use crate::serializer::{JsonSerializer, Serializer};

// Transport types
pub use crate::transport::{BoxedTransport, HttpTransport, Transport};

// Protocol types
pub use kite_json_rpc::prelude::*;
