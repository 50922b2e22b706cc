use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::error::RpcError;

use super::transport::{RawResponse, RpcTransport};

/// What the mock node does for one matched request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// HTTP 200 with `{"result": <value>, "error": null}`.
    Result(serde_json::Value),
    /// HTTP 200 with an error envelope.
    NodeError { code: i64, message: String },
    /// Arbitrary status and body.
    Raw { status: u16, body: Vec<u8> },
    /// No response at all.
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub id: u64,
    pub method: String,
    pub params: Vec<serde_json::Value>,
}

struct Route {
    method: String,
    first_param: Option<serde_json::Value>,
    reply: Reply,
}

/// A scripted node for testing. Routes are matched on method name and,
/// optionally, the first parameter; every request is recorded so tests can
/// assert which calls happened and in what order.
pub struct MockTransport {
    routes: Vec<Route>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder { routes: Vec::new() }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.method).collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.method == method).count()
    }

    fn route(&self, method: &str, params: &[serde_json::Value]) -> Option<&Reply> {
        let first = params.first();
        self.routes
            .iter()
            .find(|r| {
                r.method == method && r.first_param.is_some() && r.first_param.as_ref() == first
            })
            .or_else(|| {
                self.routes
                    .iter()
                    .find(|r| r.method == method && r.first_param.is_none())
            })
            .map(|r| &r.reply)
    }
}

pub struct MockTransportBuilder {
    routes: Vec<Route>,
}

impl MockTransportBuilder {
    pub fn reply(mut self, method: &str, reply: Reply) -> Self {
        self.routes.push(Route {
            method: method.to_owned(),
            first_param: None,
            reply,
        });
        self
    }

    pub fn reply_for(
        mut self,
        method: &str,
        first_param: serde_json::Value,
        reply: Reply,
    ) -> Self {
        self.routes.push(Route {
            method: method.to_owned(),
            first_param: Some(first_param),
            reply,
        });
        self
    }

    pub fn result(self, method: &str, result: serde_json::Value) -> Self {
        self.reply(method, Reply::Result(result))
    }

    pub fn result_for(
        self,
        method: &str,
        first_param: serde_json::Value,
        result: serde_json::Value,
    ) -> Self {
        self.reply_for(method, first_param, Reply::Result(result))
    }

    pub fn node_error(self, method: &str, code: i64, message: &str) -> Self {
        self.reply(
            method,
            Reply::NodeError {
                code,
                message: message.to_owned(),
            },
        )
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            routes: self.routes,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn send(&self, method: &str, request: Vec<u8>) -> Result<RawResponse, RpcError> {
        let request: serde_json::Value =
            serde_json::from_slice(&request).expect("client must send valid JSON");
        let id = request["id"].as_u64().expect("request must carry an integer id");
        assert_eq!(request["method"], method, "method argument must match body");
        let params = request
            .get("params")
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default();

        let reply = self.route(method, &params).cloned();
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push(RecordedCall {
                id,
                method: method.to_owned(),
                params,
            });

        match reply {
            Some(Reply::Result(result)) => Ok(RawResponse::ok(
                json!({"id": id, "result": result, "error": null}).to_string(),
            )),
            Some(Reply::NodeError { code, message }) => Ok(RawResponse::ok(
                json!({"id": id, "result": null, "error": {"code": code, "message": message}})
                    .to_string(),
            )),
            Some(Reply::Raw { status, body }) => Ok(RawResponse { status, body }),
            Some(Reply::Unreachable(reason)) => Err(RpcError::Transport(reason)),
            None => Err(RpcError::Transport(format!("no mock route for {method}"))),
        }
    }
}
