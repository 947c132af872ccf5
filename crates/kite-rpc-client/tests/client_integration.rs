//! Client facade tests driven through an in-memory transport.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use kite_rpc_client::{
    BatchCall, BatchOutcome, Context, JsonRpcErrorCode, RequestParams, ResponseValue, RpcClient,
    RpcClientError, RpcResult, Transport,
};

/// Records every payload and replays canned response payloads in order.
struct MockTransport {
    connected: bool,
    sent: Arc<Mutex<Vec<(Value, bool)>>>,
    replies: Mutex<VecDeque<Value>>,
}

impl MockTransport {
    fn new(replies: Vec<Value>) -> (Self, Arc<Mutex<Vec<(Value, bool)>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = Self {
            connected: false,
            sent: sent.clone(),
            replies: Mutex::new(replies.into()),
        };
        (transport, sent)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&mut self) -> RpcResult<()> {
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> RpcResult<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send(
        &mut self,
        payload: Value,
        without_response: bool,
        _context: &Context,
    ) -> RpcResult<(Option<Value>, Context)> {
        self.sent.lock().unwrap().push((payload, without_response));
        if without_response {
            return Ok((None, Context::new()));
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("test sent more requests than replies were queued");
        Ok((Some(reply), Context::new()))
    }
}

/// Violates the transport contract: never returns a payload.
struct SilentTransport;

#[async_trait]
impl Transport for SilentTransport {
    async fn connect(&mut self) -> RpcResult<()> {
        Ok(())
    }

    async fn disconnect(&mut self) -> RpcResult<()> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }

    async fn send(
        &mut self,
        _payload: Value,
        _without_response: bool,
        _context: &Context,
    ) -> RpcResult<(Option<Value>, Context)> {
        Ok((None, Context::new()))
    }
}

fn client_with_replies(replies: Vec<Value>) -> (RpcClient, Arc<Mutex<Vec<(Value, bool)>>>) {
    let (transport, sent) = MockTransport::new(replies);
    (RpcClient::new(Box::new(transport)), sent)
}

fn sent_id(payload: &Value) -> Value {
    payload.get("id").cloned().expect("payload carries no id")
}

#[tokio::test]
async fn call_returns_result_and_sends_well_formed_payload() {
    // The client generates the id, so the reply has to be built from the
    // request payload rather than canned ahead of time.
    struct EchoTransport;

    #[async_trait]
    impl Transport for EchoTransport {
        async fn connect(&mut self) -> RpcResult<()> {
            Ok(())
        }
        async fn disconnect(&mut self) -> RpcResult<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
        async fn send(
            &mut self,
            payload: Value,
            without_response: bool,
            _context: &Context,
        ) -> RpcResult<(Option<Value>, Context)> {
            assert!(!without_response);
            assert_eq!(payload["method"], json!("sum"));
            assert_eq!(payload["jsonrpc"], json!("2.0"));
            assert_eq!(payload["params"], json!([2, 3]));
            let reply = json!({"jsonrpc": "2.0", "id": payload["id"], "result": 5});
            Ok((Some(reply), Context::new()))
        }
    }

    let client = RpcClient::new(Box::new(EchoTransport));
    let result = client
        .call("sum", RequestParams::positional(vec![json!(2), json!(3)]))
        .await
        .unwrap();
    assert_eq!(result, json!(5));
}

#[tokio::test]
async fn call_without_params_omits_the_params_key() {
    struct AssertingTransport;

    #[async_trait]
    impl Transport for AssertingTransport {
        async fn connect(&mut self) -> RpcResult<()> {
            Ok(())
        }
        async fn disconnect(&mut self) -> RpcResult<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
        async fn send(
            &mut self,
            payload: Value,
            _without_response: bool,
            _context: &Context,
        ) -> RpcResult<(Option<Value>, Context)> {
            assert!(payload.get("params").is_none());
            assert!(payload.get("id").is_some());
            let reply = json!({"jsonrpc": "2.0", "id": payload["id"], "result": null});
            Ok((Some(reply), Context::new()))
        }
    }

    let client = RpcClient::new(Box::new(AssertingTransport));
    let result = client.call("ping", None).await.unwrap();
    // A null result is a legitimate void result, not an error.
    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn call_raises_typed_server_errors() {
    struct ErrorTransport;

    #[async_trait]
    impl Transport for ErrorTransport {
        async fn connect(&mut self) -> RpcResult<()> {
            Ok(())
        }
        async fn disconnect(&mut self) -> RpcResult<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
        async fn send(
            &mut self,
            payload: Value,
            _without_response: bool,
            _context: &Context,
        ) -> RpcResult<(Option<Value>, Context)> {
            let reply = json!({
                "jsonrpc": "2.0",
                "id": payload["id"],
                "error": {"code": -32601, "message": "no such method"}
            });
            Ok((Some(reply), Context::new()))
        }
    }

    let client = RpcClient::new(Box::new(ErrorTransport));
    let error = client.call("missing", None).await.unwrap_err();
    let protocol = error.as_protocol_error().expect("expected a protocol error");
    assert_eq!(protocol.code, JsonRpcErrorCode::MethodNotFound);
    assert_eq!(protocol.message, "no such method");
}

#[tokio::test]
async fn notify_sends_without_id_and_expects_no_response() {
    let (client, sent) = client_with_replies(vec![]);
    client.notify("heartbeat", None).await.unwrap();

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (payload, without_response) = &sent[0];
    assert!(without_response);
    assert!(payload.get("id").is_none());
    assert_eq!(payload["method"], json!("heartbeat"));
}

#[tokio::test]
#[should_panic(expected = "transport returned no payload")]
async fn silent_transport_on_a_call_is_fatal() {
    let client = RpcClient::new(Box::new(SilentTransport));
    let _ = client.call("ping", None).await;
}

#[tokio::test]
async fn batch_correlates_out_of_order_responses() {
    // Driven through direct_batch to control the ids; the facade path
    // generates random ids which a canned reply cannot reference.
    use kite_rpc_client::{JsonRpcBatchRequest, JsonRpcRequest};

    let batch = JsonRpcBatchRequest::new(vec![
        JsonRpcRequest::new(1, "a", None),
        JsonRpcRequest::notification("b", None),
        JsonRpcRequest::new(2, "c", None),
    ])
    .unwrap();

    let (transport, _) = MockTransport::new(vec![json!([
        {"jsonrpc": "2.0", "id": 2, "result": "c"},
        {"jsonrpc": "2.0", "id": 1, "result": "a"}
    ])]);
    let client = RpcClient::new(Box::new(transport));

    let response = client.direct_batch(&batch).await.unwrap().unwrap();
    let outcomes = kite_rpc_client::correlate(&batch, &response);

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0],
        BatchOutcome::Value(ResponseValue::Result(json!("a")))
    );
    assert_eq!(outcomes[1], BatchOutcome::Missing);
    assert_eq!(
        outcomes[2],
        BatchOutcome::Value(ResponseValue::Result(json!("c")))
    );
}

#[tokio::test]
async fn batch_facade_returns_one_outcome_per_entry() {
    struct BatchEchoTransport;

    #[async_trait]
    impl Transport for BatchEchoTransport {
        async fn connect(&mut self) -> RpcResult<()> {
            Ok(())
        }
        async fn disconnect(&mut self) -> RpcResult<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
        async fn send(
            &mut self,
            payload: Value,
            _without_response: bool,
            _context: &Context,
        ) -> RpcResult<(Option<Value>, Context)> {
            // Echo one success per request, in reverse wire order.
            let replies: Vec<Value> = payload
                .as_array()
                .unwrap()
                .iter()
                .rev()
                .map(|request| {
                    json!({
                        "jsonrpc": "2.0",
                        "id": request["id"],
                        "result": request["method"],
                    })
                })
                .collect();
            Ok((Some(Value::Array(replies)), Context::new()))
        }
    }

    let client = RpcClient::new(Box::new(BatchEchoTransport));
    let outcomes = client
        .batch(vec![BatchCall::from("first"), BatchCall::from("second")])
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(
        outcomes[0],
        BatchOutcome::Value(ResponseValue::Result(json!("first")))
    );
    assert_eq!(
        outcomes[1],
        BatchOutcome::Value(ResponseValue::Result(json!("second")))
    );
}

#[tokio::test]
async fn batch_unordered_returns_wire_order_values() {
    use kite_rpc_client::JsonRpcRequest;

    let (transport, _) = MockTransport::new(vec![json!([
        {"jsonrpc": "2.0", "id": 2, "result": "late"},
        {"jsonrpc": "2.0", "id": 1, "error": {"code": -32603, "message": "boom"}}
    ])]);
    let client = RpcClient::new(Box::new(transport));

    let values = client
        .batch_unordered(vec![
            BatchCall::from(JsonRpcRequest::new(1, "a", None)),
            BatchCall::from(JsonRpcRequest::new(2, "b", None)),
        ])
        .await
        .unwrap();

    assert_eq!(values.len(), 2);
    assert_eq!(values[0], ResponseValue::Result(json!("late")));
    assert!(values[1].is_error());
}

#[tokio::test]
async fn batch_notify_forces_notification_form() {
    let (client, sent) = client_with_replies(vec![]);
    client
        .batch_notify(vec![BatchCall::from("a"), BatchCall::from("b")])
        .await
        .unwrap();

    let sent = sent.lock().unwrap();
    let (payload, without_response) = &sent[0];
    assert!(without_response);
    for entry in payload.as_array().unwrap() {
        assert!(entry.get("id").is_none());
    }
}

#[tokio::test]
async fn empty_batch_fails_before_the_transport() {
    let (client, sent) = client_with_replies(vec![]);
    let error = client.batch(vec![]).await.unwrap_err();
    let protocol = error.as_protocol_error().expect("expected a protocol error");
    assert_eq!(protocol.code, JsonRpcErrorCode::InvalidRequest);
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_batch_response_is_a_parse_error() {
    use kite_rpc_client::JsonRpcRequest;

    let (transport, _) = MockTransport::new(vec![json!([])]);
    let client = RpcClient::new(Box::new(transport));

    let error = client
        .batch(vec![BatchCall::from(JsonRpcRequest::new(1, "a", None))])
        .await
        .unwrap_err();
    let protocol = error.as_protocol_error().expect("expected a protocol error");
    assert_eq!(protocol.code, JsonRpcErrorCode::ParseError);
}

#[tokio::test]
async fn duplicate_ids_surface_every_value() {
    use kite_rpc_client::JsonRpcRequest;

    let (transport, _) = MockTransport::new(vec![json!([
        {"jsonrpc": "2.0", "id": 1, "result": "x"},
        {"jsonrpc": "2.0", "id": 1, "result": "y"}
    ])]);
    let client = RpcClient::new(Box::new(transport));

    let outcomes = client
        .batch(vec![BatchCall::from(JsonRpcRequest::new(1, "a", None))])
        .await
        .unwrap();

    let BatchOutcome::Duplicated(duplicated) = &outcomes[0] else {
        panic!("expected a duplicated outcome, got {:?}", outcomes[0]);
    };
    assert_eq!(
        duplicated.values(),
        &[
            ResponseValue::Result(json!("x")),
            ResponseValue::Result(json!("y"))
        ]
    );
}

#[tokio::test]
async fn connect_and_disconnect_track_transport_state() {
    let (client, _) = client_with_replies(vec![]);
    assert!(!client.is_connected().await);
    client.connect().await.unwrap();
    assert!(client.is_connected().await);
    client.disconnect().await.unwrap();
    assert!(!client.is_connected().await);
}

#[tokio::test]
async fn batch_entries_get_distinct_generated_ids() {
    struct CountingTransport;

    #[async_trait]
    impl Transport for CountingTransport {
        async fn connect(&mut self) -> RpcResult<()> {
            Ok(())
        }
        async fn disconnect(&mut self) -> RpcResult<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
        async fn send(
            &mut self,
            payload: Value,
            _without_response: bool,
            _context: &Context,
        ) -> RpcResult<(Option<Value>, Context)> {
            let entries = payload.as_array().unwrap();
            let ids: std::collections::HashSet<String> =
                entries.iter().map(|e| sent_id(e).to_string()).collect();
            assert_eq!(ids.len(), entries.len(), "generated ids must be distinct");
            let replies: Vec<Value> = entries
                .iter()
                .map(|e| json!({"jsonrpc": "2.0", "id": e["id"], "result": true}))
                .collect();
            Ok((Some(Value::Array(replies)), Context::new()))
        }
    }

    let client = RpcClient::new(Box::new(CountingTransport));
    let outcomes = client
        .batch(vec![
            BatchCall::from("a"),
            BatchCall::from("b"),
            BatchCall::from("c"),
        ])
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 3);
}

#[tokio::test]
async fn malformed_shorthand_is_rejected() {
    let error = BatchCall::from_value(&json!(["m", [1], {"k": 2}, "extra"])).unwrap_err();
    assert_eq!(error.code, JsonRpcErrorCode::InvalidParams);

    let error: RpcClientError = error.into();
    assert!(error.is_protocol_error());
}
