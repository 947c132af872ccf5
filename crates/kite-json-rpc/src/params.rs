use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::JsonRpcError;

/// Request parameters as a tagged variant.
///
/// JSON-RPC supports exactly one params shape per request, so the
/// positional/named duality is modeled as an enum rather than two optional
/// fields; "no params at all" is `Option::<RequestParams>::None` and is
/// omitted from the wire payload entirely (not emitted as `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestParams {
    /// Positional parameters as an array.
    Positional(Vec<Value>),
    /// Named parameters as an object.
    Named(Map<String, Value>),
}

impl RequestParams {
    /// Normalize an arbitrary wire value: an array becomes positional
    /// params, an object becomes named params, anything else (including an
    /// explicit `null`) fails with `InvalidParams`.
    pub fn from_value(value: Value) -> Result<Self, JsonRpcError> {
        match value {
            Value::Array(items) => Ok(RequestParams::Positional(items)),
            Value::Object(map) => Ok(RequestParams::Named(map)),
            other => Err(JsonRpcError::invalid_params(format!(
                "params must be an array or an object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Reduce an args/kwargs pair to the single canonical params shape.
    ///
    /// Only args gives positional params, only kwargs gives named params,
    /// both empty gives no params at all. Both non-empty cannot be reduced
    /// to one wire shape and fails with `InvalidParams`.
    pub fn from_parts(
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Option<Self>, JsonRpcError> {
        match (args.is_empty(), kwargs.is_empty()) {
            (true, true) => Ok(None),
            (false, true) => Ok(Some(RequestParams::Positional(args))),
            (true, false) => Ok(Some(RequestParams::Named(kwargs))),
            (false, false) => Err(JsonRpcError::invalid_params(
                "positional and named params can not be combined in one request",
            )),
        }
    }

    pub fn positional(args: Vec<Value>) -> Self {
        RequestParams::Positional(args)
    }

    pub fn named(kwargs: Map<String, Value>) -> Self {
        RequestParams::Named(kwargs)
    }

    /// The positional view: the args for array params, empty for object params.
    pub fn args(&self) -> &[Value] {
        match self {
            RequestParams::Positional(items) => items,
            RequestParams::Named(_) => &[],
        }
    }

    /// The named view: the kwargs for object params, `None` for array params.
    pub fn kwargs(&self) -> Option<&Map<String, Value>> {
        match self {
            RequestParams::Named(map) => Some(map),
            RequestParams::Positional(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RequestParams::Positional(items) => items.is_empty(),
            RequestParams::Named(map) => map.is_empty(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RequestParams::Positional(items) => Value::Array(items.clone()),
            RequestParams::Named(map) => Value::Object(map.clone()),
        }
    }
}

impl From<Vec<Value>> for RequestParams {
    fn from(args: Vec<Value>) -> Self {
        RequestParams::Positional(args)
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(kwargs: Map<String, Value>) -> Self {
        RequestParams::Named(kwargs)
    }
}

/// Three-state view of an object field at the decoding boundary.
///
/// JSON-RPC distinguishes "no params field" from `"params": null`, so a
/// nullable type alone can not represent a decoded field.
#[derive(Debug, Clone, PartialEq)]
pub enum WireField {
    Absent,
    Null,
    Value(Value),
}

impl WireField {
    pub fn of(object: &Map<String, Value>, key: &str) -> Self {
        match object.get(key) {
            None => WireField::Absent,
            Some(Value::Null) => WireField::Null,
            Some(value) => WireField::Value(value.clone()),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
