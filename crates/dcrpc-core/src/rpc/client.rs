use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::RpcError;

use super::decode::{DecodeObserver, SafeDecoder, TracingObserver};
use super::protocol::{Envelope, RpcCommand};
use super::transport::RpcTransport;

/// One JSON-RPC round-trip: encode the command, send it, decode the body.
///
/// Holds no per-call state besides the id counter, so a single client is
/// shared by every concurrent caller.
pub struct RpcClient {
    transport: Arc<dyn RpcTransport>,
    decoder: SafeDecoder,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn RpcTransport>, observer: Arc<dyn DecodeObserver>) -> Self {
        Self {
            transport,
            decoder: SafeDecoder::new(observer),
            next_id: AtomicU64::new(1),
        }
    }

    /// Client whose decode faults are logged through `tracing`.
    pub fn with_transport(transport: Arc<dyn RpcTransport>) -> Self {
        Self::new(transport, Arc::new(TracingObserver))
    }

    fn reserve_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Issue `method` and decode the envelope.
    ///
    /// A non-200 status is not an error by itself: the body is still decoded,
    /// since the node reports JSON-RPC errors with HTTP 500. Only when that
    /// decode fails too does the status surface, as [`RpcError::HttpStatus`].
    pub async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<Envelope<R>, RpcError> {
        let id = self.reserve_request_id();
        debug!(
            rpc.id = id,
            rpc.method = method,
            rpc.params = params.len(),
            "rpc call"
        );
        let request = serde_json::to_vec(&RpcCommand { id, method, params })
            .map_err(RpcError::Encode)?;

        let response = self.transport.send(method, request).await?;

        match self.decoder.decode::<R>(method, &response.body) {
            Ok(envelope) => Ok(envelope),
            Err(err) if !response.is_success() => Err(RpcError::HttpStatus {
                status: response.status,
                source: Box::new(err),
            }),
            Err(err) => Err(err),
        }
    }

    /// [`call`](Self::call), then unwrap the result or the node's error
    /// tagged with `context`.
    pub async fn call_result<R: DeserializeOwned>(
        &self,
        context: &'static str,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<R, RpcError> {
        self.call::<R>(method, params).await?.into_result(context)
    }
}
