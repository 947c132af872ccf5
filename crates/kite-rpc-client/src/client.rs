//! Main RPC client implementation

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use kite_json_rpc::{
    correlate, BatchOutcome, Context, ErrorRegistry, JsonRpcBatchRequest, JsonRpcBatchResponse,
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId, RequestParams, ResponseValue,
};

use crate::batch::BatchCall;
use crate::config::ClientConfig;
use crate::error::{RpcClientError, RpcResult};
use crate::transport::BoxedTransport;

/// Generate a request id statistically unlikely to collide within one
/// process's in-flight calls. Collisions are tolerated by correlation, not
/// prevented here.
pub fn generate_id() -> RequestId {
    RequestId::Number(rand::random::<u32>() as i64)
}

/// JSON-RPC 2.0 client facade.
///
/// Composes the protocol model over an injected transport: single calls,
/// notifications, and batches with or without response correlation.
pub struct RpcClient {
    /// Transport layer
    transport: Arc<tokio::sync::Mutex<BoxedTransport>>,
    /// Error-code table used to type server error objects
    errors: ErrorRegistry,
    /// Configuration
    config: ClientConfig,
}

impl RpcClient {
    /// Create a client over a transport with default configuration.
    pub fn new(transport: BoxedTransport) -> Self {
        Self {
            transport: Arc::new(tokio::sync::Mutex::new(transport)),
            errors: ErrorRegistry::default(),
            config: ClientConfig::default(),
        }
    }

    pub fn builder() -> RpcClientBuilder {
        RpcClientBuilder::new()
    }

    /// Connect the underlying transport. Must precede any call.
    pub async fn connect(&self) -> RpcResult<()> {
        info!("connecting RPC client");
        let mut transport = self.transport.lock().await;
        transport.connect().await
    }

    /// Disconnect the underlying transport.
    pub async fn disconnect(&self) -> RpcResult<()> {
        info!("disconnecting RPC client");
        let mut transport = self.transport.lock().await;
        transport.disconnect().await
    }

    pub async fn is_connected(&self) -> bool {
        let transport = self.transport.lock().await;
        transport.is_connected()
    }

    /// Call a remote method and return its result, or fail with the typed
    /// error the server reported.
    pub async fn call(
        &self,
        method: &str,
        params: impl Into<Option<RequestParams>>,
    ) -> RpcResult<Value> {
        let request = JsonRpcRequest::new(generate_id(), method, params.into());
        let response = self
            .direct_call(request)
            .await?
            // A call is not a notification, so the transport contract
            // guarantees a response; a missing one is a broken collaborator,
            // not a protocol-level anomaly.
            .expect("transport returned no response for a call expecting one");
        response.value.into_result().map_err(RpcClientError::from)
    }

    /// Send a notification: fire-and-forget, no result.
    pub async fn notify(
        &self,
        method: &str,
        params: impl Into<Option<RequestParams>>,
    ) -> RpcResult<()> {
        let request = JsonRpcRequest::notification(method, params.into());
        self.direct_call(request).await?;
        Ok(())
    }

    /// Send a batch and correlate the responses back to the entries, in
    /// entry order. Per-item errors come back as values in the outcome
    /// sequence; raising one would lose the rest of the batch.
    pub async fn batch(
        &self,
        calls: impl IntoIterator<Item = BatchCall>,
    ) -> RpcResult<Vec<BatchOutcome>> {
        let request = self.build_batch(calls, false)?;
        let response = self
            .direct_batch(&request)
            .await?
            .expect("transport returned no response for a batch expecting one");
        Ok(correlate(&request, &response))
    }

    /// Send a batch and return the raw per-response values in wire order,
    /// without correlation.
    pub async fn batch_unordered(
        &self,
        calls: impl IntoIterator<Item = BatchCall>,
    ) -> RpcResult<Vec<ResponseValue>> {
        let request = self.build_batch(calls, false)?;
        let response = self
            .direct_batch(&request)
            .await?
            .expect("transport returned no response for a batch expecting one");
        Ok(response
            .responses()
            .iter()
            .map(|item| item.value.clone())
            .collect())
    }

    /// Send a batch of notifications; no results are returned.
    pub async fn batch_notify(
        &self,
        calls: impl IntoIterator<Item = BatchCall>,
    ) -> RpcResult<()> {
        let request = self.build_batch(calls, true)?;
        self.direct_batch(&request).await?;
        Ok(())
    }

    /// Perform one round trip for a prepared request. Returns `None` iff
    /// the request is a notification.
    pub async fn direct_call(
        &self,
        request: JsonRpcRequest,
    ) -> RpcResult<Option<JsonRpcResponse>> {
        let without_response = request.is_notification();
        if self.config.log_requests {
            debug!(
                method = %request.method,
                notification = without_response,
                "sending request"
            );
        }

        let (raw, context) = {
            let mut transport = self.transport.lock().await;
            transport
                .send(request.to_wire(), without_response, &request.context)
                .await?
        };

        if without_response {
            return Ok(None);
        }

        let raw = raw.expect("transport returned no payload for a request expecting a response");
        let response = JsonRpcResponse::from_wire(&raw, &self.errors)?.with_context(context);
        if self.config.log_responses {
            debug!(error = response.value.is_error(), "received response");
        }
        Ok(Some(response))
    }

    /// Perform one round trip for a prepared batch. Returns `None` iff
    /// every member is a notification.
    pub async fn direct_batch(
        &self,
        batch: &JsonRpcBatchRequest,
    ) -> RpcResult<Option<JsonRpcBatchResponse>> {
        let without_response = batch.is_notification();
        if self.config.log_requests {
            debug!(
                size = batch.len(),
                notification = without_response,
                "sending batch request"
            );
        }

        let (raw, _context) = {
            let mut transport = self.transport.lock().await;
            transport
                .send(batch.to_wire(), without_response, &Context::new())
                .await?
        };

        if without_response {
            return Ok(None);
        }

        let raw = raw.expect("transport returned no payload for a batch expecting a response");
        if raw.is_null() || raw.as_array().is_some_and(Vec::is_empty) {
            return Err(JsonRpcError::parse_error(
                "the server returned an empty batch response",
            )
            .into());
        }

        let response = JsonRpcBatchResponse::from_wire(&raw, &self.errors)?;
        if self.config.log_responses {
            debug!(size = response.len(), "received batch response");
        }
        Ok(Some(response))
    }

    fn build_batch(
        &self,
        calls: impl IntoIterator<Item = BatchCall>,
        notify: bool,
    ) -> RpcResult<JsonRpcBatchRequest> {
        let requests = calls
            .into_iter()
            .map(|call| call.into_request(if notify { None } else { Some(generate_id()) }))
            .collect::<Result<Vec<_>, _>>()?;
        JsonRpcBatchRequest::new(requests).map_err(Into::into)
    }
}

impl Drop for RpcClient {
    /// Best-effort disconnect when the client is dropped without an
    /// explicit `disconnect`, so the scoped-session contract holds on all
    /// exit paths.
    fn drop(&mut self) {
        let transport = self.transport.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let mut transport = transport.lock().await;
                if transport.is_connected() {
                    if let Err(e) = transport.disconnect().await {
                        warn!(error = %e, "failed to disconnect transport during drop");
                    }
                }
            });
        }
    }
}

/// Builder for [`RpcClient`].
pub struct RpcClientBuilder {
    transport: Option<BoxedTransport>,
    errors: ErrorRegistry,
    config: ClientConfig,
}

impl RpcClientBuilder {
    pub fn new() -> Self {
        Self {
            transport: None,
            errors: ErrorRegistry::default(),
            config: ClientConfig::default(),
        }
    }

    pub fn with_transport(mut self, transport: BoxedTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the default error-code table.
    pub fn with_error_registry(mut self, errors: ErrorRegistry) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> RpcResult<RpcClient> {
        let transport = self
            .transport
            .ok_or_else(|| RpcClientError::config("a transport is required"))?;
        Ok(RpcClient {
            transport: Arc::new(tokio::sync::Mutex::new(transport)),
            errors: self.errors,
            config: self.config,
        })
    }
}

impl Default for RpcClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_numeric() {
        for _ in 0..32 {
            let RequestId::Number(n) = generate_id() else {
                panic!("expected a numeric id");
            };
            assert!(n >= 0);
        }
    }

    #[test]
    fn test_builder_requires_transport() {
        let result = RpcClientBuilder::new().build();
        assert!(matches!(result, Err(RpcClientError::Config(_))));
    }
}
