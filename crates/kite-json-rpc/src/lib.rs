//! # JSON-RPC 2.0 Protocol Model
//!
//! A pure, transport-agnostic JSON-RPC 2.0 data model for the client role:
//! requests, notifications, responses, batches, a typed error taxonomy and
//! the correlation algorithm that matches an unordered batch response back
//! to the ordered request list.
//!
//! ## Features
//! - Full JSON-RPC 2.0 wire-shape compliance (absent vs `null` fields
//!   preserved at the decoding boundary)
//! - Transport agnostic: no I/O, no async, just data
//! - Batch correlation tolerant of missing, duplicate and id-less responses
//! - Extensible error-code registry with the standard codes built in

pub mod batch;
pub mod error;
pub mod params;
pub mod prelude;
pub mod request;
pub mod response;
pub mod types;

// Re-export main types
pub use batch::{correlate, BatchOutcome, DuplicatedResults, UnlinkedResults};
pub use error::{ErrorRegistry, JsonRpcError, JsonRpcErrorCode};
pub use params::{RequestParams, WireField};
pub use request::{JsonRpcBatchRequest, JsonRpcRequest};
pub use response::{JsonRpcBatchResponse, JsonRpcResponse, ResponseValue};
pub use types::{Context, JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
