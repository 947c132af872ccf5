use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// JSON-RPC error kinds.
///
/// The five standard codes are closed variants; the reserved server range
/// and everything else stay open-ended so unknown codes from a server are
/// still representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Implementation-defined server errors, -32099 to -32000.
    ServerError(i64),
    /// Any other application-defined code.
    ApplicationError(i64),
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => crate::error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => crate::error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::MethodNotFound => crate::error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => crate::error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => crate::error_codes::INTERNAL_ERROR,
            JsonRpcErrorCode::ServerError(code) => *code,
            JsonRpcErrorCode::ApplicationError(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::ServerError(_) => "Server error",
            JsonRpcErrorCode::ApplicationError(_) => "Application error",
        }
    }

    /// Classify a raw numeric code into the most specific kind.
    pub fn from_code(code: i64) -> Self {
        match code {
            crate::error_codes::PARSE_ERROR => JsonRpcErrorCode::ParseError,
            crate::error_codes::INVALID_REQUEST => JsonRpcErrorCode::InvalidRequest,
            crate::error_codes::METHOD_NOT_FOUND => JsonRpcErrorCode::MethodNotFound,
            crate::error_codes::INVALID_PARAMS => JsonRpcErrorCode::InvalidParams,
            crate::error_codes::INTERNAL_ERROR => JsonRpcErrorCode::InternalError,
            c if (crate::error_codes::SERVER_ERROR_START..=crate::error_codes::SERVER_ERROR_END)
                .contains(&c) =>
            {
                JsonRpcErrorCode::ServerError(c)
            }
            c => JsonRpcErrorCode::ApplicationError(c),
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// A typed JSON-RPC error: kind, message and optional data.
///
/// Used both to raise protocol-level failures locally (bad params, bad
/// request shape) and to reconstruct an error object received from a
/// server, so callers handle both through the same taxonomy.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("JSON-RPC error {}: {message}", .code.code())]
pub struct JsonRpcError {
    pub code: JsonRpcErrorCode,
    pub message: String,
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(JsonRpcErrorCode::ParseError, Some(message.into()), None)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidRequest, Some(message.into()), None)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            JsonRpcErrorCode::MethodNotFound,
            Some(format!("Method '{}' not found", method)),
            None,
        )
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidParams, Some(message.into()), None)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(JsonRpcErrorCode::InternalError, Some(message.into()), None)
    }

    pub fn server_error(code: i64, message: &str, data: Option<Value>) -> Self {
        debug_assert!(
            (crate::error_codes::SERVER_ERROR_START..=crate::error_codes::SERVER_ERROR_END)
                .contains(&code)
        );
        Self::new(
            JsonRpcErrorCode::ServerError(code),
            Some(message.to_string()),
            data,
        )
    }

    pub fn application_error(code: i64, message: &str, data: Option<Value>) -> Self {
        Self::new(
            JsonRpcErrorCode::ApplicationError(code),
            Some(message.to_string()),
            data,
        )
    }

    /// The wire error object: `{code, message, data?}`.
    pub fn to_wire(&self) -> Value {
        serde_json::to_value(WireErrorObject {
            code: self.code.code(),
            message: self.message.clone(),
            data: self.data.clone(),
        })
        .unwrap_or(Value::Null)
    }
}

/// The raw `error` member of a wire response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireErrorObject {
    code: i64,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

/// Explicit code-to-kind table, passed into the client at construction.
///
/// Resolution never fails: codes outside the table fall back to the
/// server-error range rule and then to `ApplicationError`, so an unknown
/// code still produces a raisable error.
#[derive(Debug, Clone)]
pub struct ErrorRegistry {
    known: HashMap<i64, JsonRpcErrorCode>,
}

impl Default for ErrorRegistry {
    fn default() -> Self {
        let mut registry = Self {
            known: HashMap::new(),
        };
        for code in [
            JsonRpcErrorCode::ParseError,
            JsonRpcErrorCode::InvalidRequest,
            JsonRpcErrorCode::MethodNotFound,
            JsonRpcErrorCode::InvalidParams,
            JsonRpcErrorCode::InternalError,
        ] {
            registry.register(code);
        }
        registry
    }
}

impl ErrorRegistry {
    /// Register an additional (application-defined) code.
    pub fn register(&mut self, code: JsonRpcErrorCode) {
        self.known.insert(code.code(), code);
    }

    /// Resolve a raw code/message/data triple to the most specific kind.
    pub fn resolve(&self, code: i64, message: Option<String>, data: Option<Value>) -> JsonRpcError {
        let kind = self
            .known
            .get(&code)
            .copied()
            .unwrap_or_else(|| JsonRpcErrorCode::from_code(code));
        JsonRpcError::new(kind, message, data)
    }

    /// Resolve a wire `error` object. A malformed object (not an object, or
    /// missing/non-integer code) fails with `ParseError`.
    pub fn resolve_wire(&self, value: &Value) -> Result<JsonRpcError, JsonRpcError> {
        let object: WireErrorObject = serde_json::from_value(value.clone()).map_err(|e| {
            JsonRpcError::parse_error(format!("malformed error object: {}", e))
        })?;
        Ok(self.resolve(object.code, Some(object.message), object.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_standard_codes() {
        assert_eq!(JsonRpcErrorCode::ParseError.code(), -32700);
        assert_eq!(JsonRpcErrorCode::InvalidRequest.code(), -32600);
        assert_eq!(JsonRpcErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(JsonRpcErrorCode::InvalidParams.code(), -32602);
        assert_eq!(JsonRpcErrorCode::InternalError.code(), -32603);
    }

    #[test]
    fn test_code_classification() {
        assert_eq!(JsonRpcErrorCode::from_code(-32700), JsonRpcErrorCode::ParseError);
        assert_eq!(
            JsonRpcErrorCode::from_code(-32050),
            JsonRpcErrorCode::ServerError(-32050)
        );
        assert_eq!(
            JsonRpcErrorCode::from_code(12345),
            JsonRpcErrorCode::ApplicationError(12345)
        );
    }

    #[test]
    fn test_registry_resolves_known_codes() {
        let registry = ErrorRegistry::default();
        let error = registry.resolve(-32601, None, None);
        assert_eq!(error.code, JsonRpcErrorCode::MethodNotFound);
        assert_eq!(error.message, "Method not found");
    }

    #[test]
    fn test_registry_falls_back_on_unknown_codes() {
        let registry = ErrorRegistry::default();
        let error = registry.resolve(777, Some("boom".into()), Some(json!({"k": 1})));
        assert_eq!(error.code, JsonRpcErrorCode::ApplicationError(777));
        assert_eq!(error.message, "boom");
        assert_eq!(error.data, Some(json!({"k": 1})));
    }

    #[test]
    fn test_registry_custom_registration() {
        let mut registry = ErrorRegistry::default();
        registry.register(JsonRpcErrorCode::ApplicationError(1001));
        let error = registry.resolve(1001, Some("quota exceeded".into()), None);
        assert_eq!(error.code, JsonRpcErrorCode::ApplicationError(1001));
    }

    #[test]
    fn test_resolve_wire() {
        let registry = ErrorRegistry::default();
        let error = registry
            .resolve_wire(&json!({"code": -32602, "message": "bad params"}))
            .unwrap();
        assert_eq!(error.code, JsonRpcErrorCode::InvalidParams);
        assert_eq!(error.message, "bad params");

        assert!(registry.resolve_wire(&json!("nope")).is_err());
        assert!(registry.resolve_wire(&json!({"message": "no code"})).is_err());
    }

    #[test]
    fn test_error_to_wire_omits_absent_data() {
        let error = JsonRpcError::method_not_found("ping");
        let wire = error.to_wire();
        assert_eq!(wire["code"], json!(-32601));
        assert!(wire.get("data").is_none());
    }
}
