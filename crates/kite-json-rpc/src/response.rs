use serde_json::{Map, Value};

use crate::error::{ErrorRegistry, JsonRpcError};
use crate::params::WireField;
use crate::types::{validate_version, Context, JsonRpcVersion, RequestId};

/// The outcome carried by one response: exactly one of a result or an
/// error, per protocol. A legitimate `null` result is `Result(Value::Null)`
/// and is distinct from "no result".
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    Result(Value),
    Error(JsonRpcError),
}

impl ResponseValue {
    pub fn is_error(&self) -> bool {
        matches!(self, ResponseValue::Error(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            ResponseValue::Result(value) => Some(value),
            ResponseValue::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&JsonRpcError> {
        match self {
            ResponseValue::Error(error) => Some(error),
            ResponseValue::Result(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        match self {
            ResponseValue::Result(value) => Ok(value),
            ResponseValue::Error(error) => Err(error),
        }
    }
}

/// A JSON-RPC response.
///
/// `id == None` marks an *unlinked* response: notifications can not produce
/// responses, so an id-less response is anomalous, but it can legally occur
/// on the wire and is preserved rather than discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcResponse {
    pub id: Option<RequestId>,
    pub version: JsonRpcVersion,
    pub value: ResponseValue,
    pub context: Context,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            id,
            version: JsonRpcVersion::V2_0,
            value: ResponseValue::Result(result),
            context: Context::new(),
        }
    }

    pub fn error(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self {
            id,
            version: JsonRpcVersion::V2_0,
            value: ResponseValue::Error(error),
            context: Context::new(),
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn is_unlinked(&self) -> bool {
        self.id.is_none()
    }

    pub fn to_wire(&self) -> Value {
        let mut data = Map::new();
        data.insert(
            "jsonrpc".to_string(),
            Value::from(self.version.as_str()),
        );
        data.insert(
            "id".to_string(),
            self.id.as_ref().map(RequestId::to_value).unwrap_or(Value::Null),
        );
        match &self.value {
            ResponseValue::Result(result) => {
                data.insert("result".to_string(), result.clone());
            }
            ResponseValue::Error(error) => {
                data.insert("error".to_string(), error.to_wire());
            }
        }
        Value::Object(data)
    }

    /// Parse a wire response, resolving an `error` member against the
    /// registry. Exactly one of `result`/`error` must be present; anything
    /// else fails with `ParseError`.
    pub fn from_wire(data: &Value, errors: &ErrorRegistry) -> Result<Self, JsonRpcError> {
        let object = data
            .as_object()
            .ok_or_else(|| JsonRpcError::parse_error("a response must be an object"))?;

        let version = match object.get("jsonrpc") {
            Some(value) => validate_version(value)
                .map_err(|e| JsonRpcError::parse_error(e.message))?,
            // Lenient on a missing version marker: the body is otherwise usable.
            None => JsonRpcVersion::V2_0,
        };

        let id = match WireField::of(object, "id") {
            WireField::Absent | WireField::Null => None,
            WireField::Value(value) => Some(
                RequestId::from_wire(&value)
                    .map_err(|_| JsonRpcError::parse_error("a response id must be an integer or a string"))?,
            ),
        };

        let result = WireField::of(object, "result");
        let error = WireField::of(object, "error");
        let value = match (result, error) {
            (WireField::Absent, WireField::Absent) => {
                return Err(JsonRpcError::parse_error(
                    "a response must carry either \"result\" or \"error\"",
                ));
            }
            (result, WireField::Absent) => {
                // `"result": null` is a valid void result.
                let value = match result {
                    WireField::Null => Value::Null,
                    WireField::Value(value) => value,
                    WireField::Absent => unreachable!(),
                };
                ResponseValue::Result(value)
            }
            (WireField::Absent, WireField::Value(error_object)) => {
                ResponseValue::Error(errors.resolve_wire(&error_object)?)
            }
            (WireField::Absent, WireField::Null) => {
                return Err(JsonRpcError::parse_error(
                    "a response error must be an object",
                ));
            }
            _ => {
                return Err(JsonRpcError::parse_error(
                    "a response must not carry both \"result\" and \"error\"",
                ));
            }
        };

        Ok(Self {
            id,
            version,
            value,
            context: Context::new(),
        })
    }
}

/// An ordered list of responses in wire order.
///
/// Servers are not required to preserve, or even communicate, request
/// order; correlation back to the request list happens separately.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonRpcBatchResponse {
    responses: Vec<JsonRpcResponse>,
}

impl JsonRpcBatchResponse {
    pub fn new(responses: Vec<JsonRpcResponse>) -> Self {
        Self { responses }
    }

    pub fn responses(&self) -> &[JsonRpcResponse] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Parse a wire batch response; each element is parsed independently.
    /// A payload that is not an array at all fails with `ParseError`.
    pub fn from_wire(data: &Value, errors: &ErrorRegistry) -> Result<Self, JsonRpcError> {
        let items = data
            .as_array()
            .ok_or_else(|| JsonRpcError::parse_error("a batch response must be an array"))?;
        let responses = items
            .iter()
            .map(|item| JsonRpcResponse::from_wire(item, errors))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { responses })
    }
}

impl IntoIterator for JsonRpcBatchResponse {
    type Item = JsonRpcResponse;
    type IntoIter = std::vec::IntoIter<JsonRpcResponse>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.into_iter()
    }
}
