//! Configuration types for the RPC client

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Client configuration
///
/// Covers connection presentation (user agent, extra headers), the HTTP
/// transport's per-request timeout and the logging toggles. Retry and
/// pooling policy stay with the transport implementation; the protocol
/// engine has no operation-level timeout of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User agent string
    pub user_agent: Option<String>,

    /// Custom headers to include in requests
    pub headers: Option<HashMap<String, String>>,

    /// Per-request timeout for the HTTP transport
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,

    /// Whether to log outgoing requests
    pub log_requests: bool,

    /// Whether to log incoming responses
    pub log_responses: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: Some(format!("kite-rpc-client/{}", env!("CARGO_PKG_VERSION"))),
            headers: None,
            request_timeout: Duration::from_secs(30),
            log_requests: true,
            log_responses: true,
        }
    }
}

// Helper module for Duration serialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
