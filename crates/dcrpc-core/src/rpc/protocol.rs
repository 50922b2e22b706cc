use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};

use crate::error::RpcError;

/// A JSON-RPC 1.0 request: no `jsonrpc` member, `params` omitted when empty.
#[derive(Debug, Serialize)]
pub(crate) struct RpcCommand<'a> {
    pub(crate) id: u64,
    pub(crate) method: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) params: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// Decoded `{error, result}` wrapper.
///
/// When `error` carries a non-empty message, `result` is always `None`,
/// whatever the node put in that member.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<R> {
    pub error: Option<RpcErrorObject>,
    pub result: Option<R>,
}

impl<R> Envelope<R> {
    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .map(|e| e.message.as_str())
            .filter(|m| !m.is_empty())
    }

    /// Turn the envelope into the result, or the node's error tagged with
    /// `context` (e.g. "error fetching block hash").
    pub fn into_result(self, context: &'static str) -> Result<R, RpcError> {
        if let Some(err) = self.error.filter(|e| !e.message.is_empty()) {
            return Err(RpcError::Server {
                context,
                code: err.code,
                message: err.message,
            });
        }
        self.result.ok_or(RpcError::MissingResult { context })
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default)]
    error: serde_json::Value,
}

/// Two-step decode: the envelope first, then `result` into `R` only when the
/// node did not report an error.
///
/// The body must be a JSON object; derived `Deserialize` would otherwise
/// accept an array such as `[]` as an envelope with every member defaulted.
pub(crate) fn decode_envelope<R: DeserializeOwned>(
    body: &[u8],
) -> Result<Envelope<R>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(serde_json::Error::custom(format!(
            "expected JSON-RPC response object, got {}",
            json_kind(&value)
        )));
    }
    let raw: RawEnvelope = serde_json::from_value(value)?;
    let error = parse_jsonrpc_error(raw.error);

    if error.as_ref().is_some_and(|e| !e.message.is_empty()) {
        return Ok(Envelope {
            error,
            result: None,
        });
    }

    let result = if raw.result.is_null() {
        None
    } else {
        Some(serde_json::from_value(raw.result)?)
    };
    Ok(Envelope { error, result })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Interpret the `error` member.
///
/// The standard shape is `{"code": <int>, "message": <string>}`; some proxies
/// in front of the node send a bare string instead, which is kept as the
/// message with code 0.
pub(crate) fn parse_jsonrpc_error(err: serde_json::Value) -> Option<RpcErrorObject> {
    match err {
        serde_json::Value::Null => None,
        serde_json::Value::String(message) => Some(RpcErrorObject { code: 0, message }),
        serde_json::Value::Object(ref map) => {
            let code = map
                .get("code")
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(0);
            let message = match map.get("message") {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            Some(RpcErrorObject { code, message })
        }
        other => Some(RpcErrorObject {
            code: 0,
            message: format!("non-standard JSON-RPC error: {other}"),
        }),
    }
}
