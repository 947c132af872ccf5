//! Error types for client operations

use thiserror::Error;

use kite_json_rpc::JsonRpcError;

/// Result type for client operations
pub type RpcResult<T> = Result<T, RpcClientError>;

/// Umbrella error type for client operations
#[derive(Error, Debug)]
pub enum RpcClientError {
    /// Protocol-level errors, locally raised or reconstructed from a
    /// server's error object
    #[error("Protocol error: {0}")]
    Protocol(#[from] JsonRpcError),

    /// Transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// JSON parsing errors outside the protocol layer
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("Error: {message}")]
    Generic { message: String },
}

/// Transport-specific errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Transport is not connected")]
    NotConnected,

    #[error("Transport closed unexpectedly")]
    Closed,

    #[error("Unsupported transport: {0}")]
    Unsupported(String),
}

impl RpcClientError {
    /// Create a generic error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if the error is a protocol-level issue
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Get the JSON-RPC error, if this is a protocol error
    pub fn as_protocol_error(&self) -> Option<&JsonRpcError> {
        match self {
            Self::Protocol(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kite_json_rpc::JsonRpcErrorCode;

    #[test]
    fn test_protocol_error_conversion() {
        let error: RpcClientError = JsonRpcError::invalid_params("bad").into();
        assert!(error.is_protocol_error());
        assert_eq!(
            error.as_protocol_error().unwrap().code,
            JsonRpcErrorCode::InvalidParams
        );
    }

    #[test]
    fn test_transport_error_display() {
        let error = RpcClientError::from(TransportError::NotConnected);
        assert!(error.to_string().contains("not connected"));
    }
}
