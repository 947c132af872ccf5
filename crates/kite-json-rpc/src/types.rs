use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::error::JsonRpcError;

/// Opaque transport metadata carried alongside requests and responses.
///
/// The protocol never inspects it; transports use it to pass things like
/// HTTP status codes and headers back to the caller.
pub type Context = HashMap<String, Value>;

/// A JSON-RPC request id.
///
/// The protocol allows numbers and strings. Uniqueness is only best-effort
/// within one call or one batch; the correlation algorithm tolerates
/// duplicates rather than assuming they cannot happen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n)
    }
}

impl From<i32> for RequestId {
    fn from(n: i32) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

impl RequestId {
    /// Parse an id from its wire value. `null` is not a valid id here;
    /// callers map it to "no id" before reaching this point.
    pub fn from_wire(value: &Value) -> Result<Self, JsonRpcError> {
        match value {
            Value::Number(n) => n.as_i64().map(RequestId::Number).ok_or_else(|| {
                JsonRpcError::invalid_request("a request id must be an integer or a string")
            }),
            Value::String(s) => Ok(RequestId::String(s.clone())),
            _ => Err(JsonRpcError::invalid_request(
                "a request id must be an integer or a string",
            )),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RequestId::Number(n) => Value::from(*n),
            RequestId::String(s) => Value::from(s.clone()),
        }
    }
}

/// The protocol version marker. Serializes as exactly `"2.0"`; any other
/// version string on the wire is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JsonRpcVersion {
    #[default]
    #[serde(rename = "2.0")]
    V2_0,
}

impl JsonRpcVersion {
    pub fn as_str(&self) -> &'static str {
        crate::JSONRPC_VERSION
    }
}

impl fmt::Display for JsonRpcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a version value from the wire, failing with `InvalidRequest`
/// for anything other than the single supported version.
pub fn validate_version(value: &Value) -> Result<JsonRpcVersion, JsonRpcError> {
    match value.as_str() {
        Some(crate::JSONRPC_VERSION) => Ok(JsonRpcVersion::V2_0),
        Some(other) => Err(JsonRpcError::invalid_request(format!(
            "unsupported JSON-RPC version: {:?}",
            other
        ))),
        None => Err(JsonRpcError::invalid_request(
            "the \"jsonrpc\" field must be a string",
        )),
    }
}
