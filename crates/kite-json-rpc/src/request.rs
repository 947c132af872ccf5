use serde_json::{Map, Value};

use crate::error::JsonRpcError;
use crate::params::{RequestParams, WireField};
use crate::types::{validate_version, Context, JsonRpcVersion, RequestId};

/// A JSON-RPC request.
///
/// Immutable once constructed. A request without an id is a *notification*:
/// no response is expected and none must be sent for it.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub method: String,
    pub id: Option<RequestId>,
    pub version: JsonRpcVersion,
    pub params: Option<RequestParams>,
    pub context: Context,
}

impl JsonRpcRequest {
    pub fn new(
        id: impl Into<RequestId>,
        method: impl Into<String>,
        params: Option<RequestParams>,
    ) -> Self {
        Self {
            method: method.into(),
            id: Some(id.into()),
            version: JsonRpcVersion::V2_0,
            params,
            context: Context::new(),
        }
    }

    /// Create a notification: a request with no id.
    pub fn notification(method: impl Into<String>, params: Option<RequestParams>) -> Self {
        Self {
            method: method.into(),
            id: None,
            version: JsonRpcVersion::V2_0,
            params,
            context: Context::new(),
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Emit the wire shape: `{method, jsonrpc}` plus `id` (omitted for
    /// notifications) plus `params` (omitted entirely when absent).
    pub fn to_wire(&self) -> Value {
        let mut data = Map::new();
        data.insert("method".to_string(), Value::from(self.method.clone()));
        data.insert(
            "jsonrpc".to_string(),
            Value::from(self.version.as_str()),
        );
        if let Some(id) = &self.id {
            data.insert("id".to_string(), id.to_value());
        }
        if let Some(params) = &self.params {
            data.insert("params".to_string(), params.to_value());
        }
        Value::Object(data)
    }

    /// Parse a wire request.
    ///
    /// Fails with `InvalidRequest` unless the value is an object carrying
    /// both `method` and a supported `jsonrpc` version. A `"params": null`
    /// is not the same as an absent params field and fails with
    /// `InvalidParams`.
    pub fn from_wire(data: &Value) -> Result<Self, JsonRpcError> {
        let object = data
            .as_object()
            .ok_or_else(|| JsonRpcError::invalid_request("a request must be an object"))?;

        let method = object
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                JsonRpcError::invalid_request("a request must contain \"method\" and \"jsonrpc\"")
            })?
            .to_string();
        let version = validate_version(object.get("jsonrpc").ok_or_else(|| {
            JsonRpcError::invalid_request("a request must contain \"method\" and \"jsonrpc\"")
        })?)?;

        let id = match WireField::of(object, "id") {
            WireField::Absent | WireField::Null => None,
            WireField::Value(value) => Some(RequestId::from_wire(&value)?),
        };

        let params = match WireField::of(object, "params") {
            WireField::Absent => None,
            WireField::Null => {
                return Err(JsonRpcError::invalid_params(
                    "params must be an array or an object, got null",
                ));
            }
            WireField::Value(value) => Some(RequestParams::from_value(value)?),
        };

        Ok(Self {
            method,
            id,
            version,
            params,
            context: Context::new(),
        })
    }
}

/// An ordered group of requests sent together.
///
/// Order is significant: it is the key the correlation algorithm uses to
/// produce ordered output. An empty batch is rejected at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcBatchRequest {
    requests: Vec<JsonRpcRequest>,
}

impl JsonRpcBatchRequest {
    pub fn new(requests: Vec<JsonRpcRequest>) -> Result<Self, JsonRpcError> {
        if requests.is_empty() {
            return Err(JsonRpcError::invalid_request(
                "a batch request must contain at least one request",
            ));
        }
        Ok(Self { requests })
    }

    pub fn requests(&self) -> &[JsonRpcRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// A batch is a notification iff every member is a notification.
    pub fn is_notification(&self) -> bool {
        self.requests.iter().all(JsonRpcRequest::is_notification)
    }

    pub fn to_wire(&self) -> Value {
        Value::Array(self.requests.iter().map(JsonRpcRequest::to_wire).collect())
    }

    /// Parse a wire batch, propagating the first member parse failure.
    pub fn from_wire(data: &Value) -> Result<Self, JsonRpcError> {
        let items = data
            .as_array()
            .ok_or_else(|| JsonRpcError::invalid_request("a batch request must be an array"))?;
        let requests = items
            .iter()
            .map(JsonRpcRequest::from_wire)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(requests)
    }
}

impl IntoIterator for JsonRpcBatchRequest {
    type Item = JsonRpcRequest;
    type IntoIter = std::vec::IntoIter<JsonRpcRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonRpcErrorCode;
    use serde_json::json;

    #[test]
    fn test_to_wire_with_id_and_params() {
        let request = JsonRpcRequest::new(
            1,
            "sum",
            Some(RequestParams::positional(vec![json!(2), json!(3)])),
        );
        assert_eq!(
            request.to_wire(),
            json!({"method": "sum", "jsonrpc": "2.0", "id": 1, "params": [2, 3]})
        );
    }

    #[test]
    fn test_notification_omits_id() {
        let notification = JsonRpcRequest::notification("ping", None);
        assert!(notification.is_notification());
        let wire = notification.to_wire();
        assert!(wire.get("id").is_none());
        assert!(wire.get("params").is_none());
        assert_eq!(wire, json!({"method": "ping", "jsonrpc": "2.0"}));
    }

    #[test]
    fn test_from_wire_roundtrip() {
        let original = JsonRpcRequest::new(
            "r-1",
            "echo",
            Some(RequestParams::from_value(json!({"text": "hi"})).unwrap()),
        );
        let parsed = JsonRpcRequest::from_wire(&original.to_wire()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_from_wire_requires_method_and_version() {
        let err = JsonRpcRequest::from_wire(&json!({"method": "x"})).unwrap_err();
        assert_eq!(err.code, JsonRpcErrorCode::InvalidRequest);

        let err = JsonRpcRequest::from_wire(&json!({"jsonrpc": "2.0"})).unwrap_err();
        assert_eq!(err.code, JsonRpcErrorCode::InvalidRequest);

        let err =
            JsonRpcRequest::from_wire(&json!({"method": "x", "jsonrpc": "1.0"})).unwrap_err();
        assert_eq!(err.code, JsonRpcErrorCode::InvalidRequest);

        let err = JsonRpcRequest::from_wire(&json!([1, 2])).unwrap_err();
        assert_eq!(err.code, JsonRpcErrorCode::InvalidRequest);
    }

    #[test]
    fn test_from_wire_null_params_rejected() {
        let err = JsonRpcRequest::from_wire(
            &json!({"method": "x", "jsonrpc": "2.0", "params": null}),
        )
        .unwrap_err();
        assert_eq!(err.code, JsonRpcErrorCode::InvalidParams);
    }

    #[test]
    fn test_from_wire_null_id_is_notification() {
        let request =
            JsonRpcRequest::from_wire(&json!({"method": "x", "jsonrpc": "2.0", "id": null}))
                .unwrap();
        assert!(request.is_notification());
    }

    #[test]
    fn test_empty_batch_rejected() {
        let err = JsonRpcBatchRequest::new(vec![]).unwrap_err();
        assert_eq!(err.code, JsonRpcErrorCode::InvalidRequest);
    }

    #[test]
    fn test_batch_notification_flag() {
        let mixed = JsonRpcBatchRequest::new(vec![
            JsonRpcRequest::new(1, "a", None),
            JsonRpcRequest::notification("b", None),
        ])
        .unwrap();
        assert!(!mixed.is_notification());

        let all_notifications = JsonRpcBatchRequest::new(vec![
            JsonRpcRequest::notification("a", None),
            JsonRpcRequest::notification("b", None),
        ])
        .unwrap();
        assert!(all_notifications.is_notification());
    }

    #[test]
    fn test_batch_wire_roundtrip() {
        let batch = JsonRpcBatchRequest::new(vec![
            JsonRpcRequest::new(1, "a", Some(RequestParams::positional(vec![json!(9)]))),
            JsonRpcRequest::notification("b", None),
        ])
        .unwrap();
        let parsed = JsonRpcBatchRequest::from_wire(&batch.to_wire()).unwrap();
        assert_eq!(parsed, batch);
    }

    #[test]
    fn test_batch_from_wire_propagates_member_failure() {
        let err = JsonRpcBatchRequest::from_wire(&json!([
            {"method": "ok", "jsonrpc": "2.0"},
            {"jsonrpc": "2.0"}
        ]))
        .unwrap_err();
        assert_eq!(err.code, JsonRpcErrorCode::InvalidRequest);
    }
}
