//! # JSON-RPC Protocol Prelude
//!
//! Convenient re-exports of the most commonly used protocol types.
//!
//! ```rust
//! use kite_json_rpc::prelude::*;
//! ```

// Core JSON-RPC types
pub use crate::batch::{correlate, BatchOutcome, DuplicatedResults, UnlinkedResults};
pub use crate::error::{ErrorRegistry, JsonRpcError, JsonRpcErrorCode};
pub use crate::params::{RequestParams, WireField};
pub use crate::request::{JsonRpcBatchRequest, JsonRpcRequest};
pub use crate::response::{JsonRpcBatchResponse, JsonRpcResponse, ResponseValue};
pub use crate::types::{Context, JsonRpcVersion, RequestId};

// Standard error codes
pub use crate::error_codes::*;
