//! HTTP transport implementation
//!
//! One POST per exchange: the serialized payload goes out as the request
//! body, the decoded response body comes back as the raw response value.
//! The HTTP status and response headers are surfaced through the returned
//! `Context` under `"status"` and `"headers"`.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};
use url::Url;

use kite_json_rpc::Context;

use crate::config::ClientConfig;
use crate::error::{RpcResult, TransportError};
use crate::serializer::{JsonSerializer, Serializer};
use crate::transport::Transport;

/// HTTP transport backed by reqwest.
pub struct HttpTransport {
    /// HTTP client
    client: reqwest::Client,
    /// Server endpoint URL
    endpoint: Url,
    /// Wire codec
    serializer: Arc<dyn Serializer>,
    /// Connection state
    connected: AtomicBool,
    /// Extra headers from configuration
    headers: Vec<(String, String)>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the default configuration.
    pub fn new(endpoint: &str) -> RpcResult<Self> {
        Self::with_config(endpoint, &ClientConfig::default())
    }

    /// Create a new HTTP transport from a configuration.
    pub fn with_config(endpoint: &str, config: &ClientConfig) -> RpcResult<Self> {
        let url = Url::parse(endpoint)
            .map_err(|e| TransportError::ConnectionFailed(format!("Invalid URL: {}", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::ConnectionFailed(format!(
                "Invalid scheme for HTTP transport: {}",
                url.scheme()
            ))
            .into());
        }

        let mut builder = reqwest::Client::builder().timeout(config.request_timeout);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Http(format!("Failed to create HTTP client: {}", e)))?;

        let headers = config
            .headers
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            client,
            endpoint: url,
            serializer: Arc::new(JsonSerializer),
            connected: AtomicBool::new(false),
            headers,
        })
    }

    /// Replace the wire codec.
    pub fn with_serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializer = serializer;
        self
    }

    fn response_context(response: &reqwest::Response) -> Context {
        let mut context = Context::new();
        context.insert(
            "status".to_string(),
            Value::from(response.status().as_u16()),
        );
        let headers: Map<String, Value> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), Value::from(v)))
            })
            .collect();
        context.insert("headers".to_string(), Value::Object(headers));
        context
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn connect(&mut self) -> RpcResult<()> {
        // reqwest pools connections lazily; connecting is just marking the
        // session open so sends are rejected outside a connect/disconnect
        // scope.
        debug!(endpoint = %self.endpoint, "HTTP transport connected");
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&mut self) -> RpcResult<()> {
        debug!(endpoint = %self.endpoint, "HTTP transport disconnected");
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send(
        &mut self,
        payload: Value,
        without_response: bool,
        _context: &Context,
    ) -> RpcResult<(Option<Value>, Context)> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected.into());
        }

        let body = self.serializer.encode(&payload)?;
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let context = Self::response_context(&response);
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = %status, "HTTP request failed");
            return Err(
                TransportError::Http(format!("HTTP error {}: {}", status, error_text)).into(),
            );
        }

        if without_response {
            // Notifications get no response payload; drain the body.
            let _ = response.text().await;
            return Ok((None, context));
        }

        let text = response.text().await?;
        let value = self.serializer.decode(&text)?;
        Ok((Some(value), context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_urls() {
        assert!(HttpTransport::new("not a url").is_err());
        assert!(HttpTransport::new("ftp://example.com/rpc").is_err());
    }

    #[test]
    fn test_accepts_http_and_https() {
        assert!(HttpTransport::new("http://localhost:8080/rpc").is_ok());
        assert!(HttpTransport::new("https://example.com/rpc").is_ok());
    }

    #[test]
    fn test_starts_disconnected() {
        let transport = HttpTransport::new("http://localhost:8080/rpc").unwrap();
        assert!(!transport.is_connected());
    }
}
