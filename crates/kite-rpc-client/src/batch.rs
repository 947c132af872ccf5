//! Shorthand batch-entry descriptions
//!
//! A batch entry can be described as a bare method name, a method plus a
//! params value, a method plus separate positional and named parts, or a
//! pre-built request. The dynamic form (`from_value`) accepts a string or a
//! sequence of one to three elements; any other shape fails with
//! `InvalidParams`.

use serde_json::{Map, Value};

use kite_json_rpc::{JsonRpcError, JsonRpcRequest, RequestId, RequestParams};

/// One entry of a batch call.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchCall {
    /// Bare method name, no params.
    Method(String),
    /// Method plus canonical params.
    WithParams(String, RequestParams),
    /// Method plus separate args/kwargs parts, reduced to one canonical
    /// shape when the request is built.
    WithParts(String, Vec<Value>, Map<String, Value>),
    /// A pre-built request, passed through untouched (it keeps its own id,
    /// even inside a notification batch).
    Request(JsonRpcRequest),
}

impl BatchCall {
    /// Parse the dynamic shorthand: a string, or an array of length 1
    /// (method), 2 (method, params) or 3 (method, args, kwargs).
    pub fn from_value(value: &Value) -> Result<Self, JsonRpcError> {
        match value {
            Value::String(method) => Ok(BatchCall::Method(method.clone())),
            Value::Array(items) => Self::from_sequence(items),
            _ => Err(JsonRpcError::invalid_params(
                "a batch entry must be a string or a sequence of at most three elements",
            )),
        }
    }

    fn from_sequence(items: &[Value]) -> Result<Self, JsonRpcError> {
        let method = items
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| {
                JsonRpcError::invalid_params("a batch entry must start with a method name")
            })?
            .to_string();

        match items.len() {
            1 => Ok(BatchCall::Method(method)),
            2 => Ok(BatchCall::WithParams(
                method,
                RequestParams::from_value(items[1].clone())?,
            )),
            3 => {
                let args = items[1]
                    .as_array()
                    .cloned()
                    .ok_or_else(|| JsonRpcError::invalid_params("args must be an array"))?;
                let kwargs = items[2]
                    .as_object()
                    .cloned()
                    .ok_or_else(|| JsonRpcError::invalid_params("kwargs must be an object"))?;
                Ok(BatchCall::WithParts(method, args, kwargs))
            }
            _ => Err(JsonRpcError::invalid_params(
                "a batch entry must be a string or a sequence of at most three elements",
            )),
        }
    }

    /// Build the request for this entry. `id` is the generated id for a
    /// call, or `None` to force notification form; pre-built requests
    /// ignore it.
    pub fn into_request(self, id: Option<RequestId>) -> Result<JsonRpcRequest, JsonRpcError> {
        let request = match self {
            BatchCall::Request(request) => return Ok(request),
            BatchCall::Method(method) => build(id, method, None),
            BatchCall::WithParams(method, params) => build(id, method, Some(params)),
            BatchCall::WithParts(method, args, kwargs) => {
                build(id, method, RequestParams::from_parts(args, kwargs)?)
            }
        };
        Ok(request)
    }
}

fn build(id: Option<RequestId>, method: String, params: Option<RequestParams>) -> JsonRpcRequest {
    match id {
        Some(id) => JsonRpcRequest::new(id, method, params),
        None => JsonRpcRequest::notification(method, params),
    }
}

impl From<&str> for BatchCall {
    fn from(method: &str) -> Self {
        BatchCall::Method(method.to_string())
    }
}

impl From<String> for BatchCall {
    fn from(method: String) -> Self {
        BatchCall::Method(method)
    }
}

impl From<(String, RequestParams)> for BatchCall {
    fn from((method, params): (String, RequestParams)) -> Self {
        BatchCall::WithParams(method, params)
    }
}

impl From<(&str, RequestParams)> for BatchCall {
    fn from((method, params): (&str, RequestParams)) -> Self {
        BatchCall::WithParams(method.to_string(), params)
    }
}

impl From<JsonRpcRequest> for BatchCall {
    fn from(request: JsonRpcRequest) -> Self {
        BatchCall::Request(request)
    }
}
