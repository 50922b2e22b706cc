//! Fallible decode boundary for node responses.
//!
//! A long-running indexer must survive one truncated, binary or oddly shaped
//! response. Every body goes through [`SafeDecoder::decode`], which never
//! unwinds into the caller: parse errors and panics inside deserialization
//! both come back as [`RpcError`] values, and each failure is reported to a
//! [`DecodeObserver`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::error::RpcError;

use super::protocol::{decode_envelope, Envelope};

/// Bodies shorter than this are echoed back in the error message.
pub const ECHO_LIMIT: usize = 2048;

const PREVIEW_LIMIT: usize = 2048;

const GENERIC_MESSAGE: &str = "Internal error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The body is not a JSON envelope of the expected shape.
    Malformed,
    /// Deserialization panicked and was recovered.
    Panicked,
}

/// Diagnostic event emitted once per failed decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFault {
    pub method: String,
    pub kind: FaultKind,
    pub reason: String,
    pub payload_len: usize,
    /// At most the first 2 KiB of the body, lossily decoded.
    pub payload_preview: String,
}

pub trait DecodeObserver: Send + Sync {
    fn decode_fault(&self, fault: &DecodeFault);
}

/// Default observer: one `tracing` event per fault.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DecodeObserver for TracingObserver {
    fn decode_fault(&self, fault: &DecodeFault) {
        match fault.kind {
            FaultKind::Panicked => error!(
                rpc.method = %fault.method,
                reason = %fault.reason,
                payload_len = fault.payload_len,
                payload = %fault.payload_preview,
                "unmarshal json recovered from panic"
            ),
            FaultKind::Malformed => warn!(
                rpc.method = %fault.method,
                reason = %fault.reason,
                payload_len = fault.payload_len,
                payload = %fault.payload_preview,
                "undecodable JSON-RPC response"
            ),
        }
    }
}

#[derive(Clone)]
pub struct SafeDecoder {
    observer: Arc<dyn DecodeObserver>,
}

impl SafeDecoder {
    pub fn new(observer: Arc<dyn DecodeObserver>) -> Self {
        Self { observer }
    }

    pub fn decode<R: DeserializeOwned>(
        &self,
        method: &str,
        body: &[u8],
    ) -> Result<Envelope<R>, RpcError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| decode_envelope::<R>(body)));

        match outcome {
            Ok(Ok(envelope)) => Ok(envelope),
            Ok(Err(e)) => {
                self.report(method, FaultKind::Malformed, e.to_string(), body);
                Err(RpcError::Decode {
                    message: payload_message(body),
                    source: Some(e),
                })
            }
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                self.report(method, FaultKind::Panicked, reason.clone(), body);
                Err(RpcError::DecodeFault {
                    message: payload_message(body),
                    reason,
                })
            }
        }
    }

    fn report(&self, method: &str, kind: FaultKind, reason: String, body: &[u8]) {
        let end = body.len().min(PREVIEW_LIMIT);
        self.observer.decode_fault(&DecodeFault {
            method: method.to_owned(),
            kind,
            reason,
            payload_len: body.len(),
            payload_preview: String::from_utf8_lossy(&body[..end]).into_owned(),
        });
    }
}

impl Default for SafeDecoder {
    fn default() -> Self {
        Self::new(Arc::new(TracingObserver))
    }
}

fn payload_message(body: &[u8]) -> String {
    if !body.is_empty() && body.len() < ECHO_LIMIT {
        format!("Error: {}", String::from_utf8_lossy(body))
    } else {
        GENERIC_MESSAGE.to_owned()
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
