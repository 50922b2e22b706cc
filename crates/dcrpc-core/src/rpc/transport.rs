use async_trait::async_trait;

use crate::error::RpcError;

/// Status and body of one HTTP exchange. The body is kept even for non-200
/// statuses because the node may put a JSON-RPC error object there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Moves one serialized request to the node and returns whatever came back.
///
/// Implementations must be safe for concurrent use; `Err` means no response
/// was received at all.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn send(&self, method: &str, request: Vec<u8>) -> Result<RawResponse, RpcError>;
}
