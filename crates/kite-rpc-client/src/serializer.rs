//! Pluggable wire serializer
//!
//! Converts the internal wire-shape `Value` to a transportable string and
//! back. The codec is explicit configuration on the transport rather than a
//! module-level global; the default is a standard JSON codec.

use serde_json::Value;

use kite_json_rpc::JsonRpcError;

/// Conversion between wire values and transportable text.
pub trait Serializer: Send + Sync {
    fn encode(&self, value: &Value) -> Result<String, JsonRpcError>;
    fn decode(&self, text: &str) -> Result<Value, JsonRpcError>;
}

/// The default serde_json codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn encode(&self, value: &Value) -> Result<String, JsonRpcError> {
        serde_json::to_string(value)
            .map_err(|e| JsonRpcError::internal_error(format!("failed to encode payload: {}", e)))
    }

    fn decode(&self, text: &str) -> Result<Value, JsonRpcError> {
        serde_json::from_str(text)
            .map_err(|e| JsonRpcError::parse_error(format!("failed to decode payload: {}", e)))
    }
}
