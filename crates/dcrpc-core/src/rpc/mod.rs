//! Decred node RPC abstraction layer.
//!
//! Defines the [`ChainBackend`] trait the indexer consumes and its JSON-RPC
//! implementation ([`DecredRpc`]). The adapter sits on an [`RpcClient`] that
//! encodes commands, sends them through an [`RpcTransport`] (HTTP in
//! production, `mock::MockTransport` in tests) and decodes replies through a
//! [`SafeDecoder`] that never unwinds into the caller.

mod client;
mod decode;
mod decred;
mod http_adapter;
#[cfg(test)]
pub mod mock;
mod protocol;
mod transport;
pub mod types;

pub use client::RpcClient;
pub use decode::{
    DecodeFault, DecodeObserver, FaultKind, SafeDecoder, TracingObserver, ECHO_LIMIT,
};
pub use decred::DecredRpc;
pub use http_adapter::{HttpTransport, MAX_IDLE_PER_HOST, POOL_IDLE_TIMEOUT};
pub use protocol::{Envelope, RpcErrorObject};
pub use transport::{RawResponse, RpcTransport};

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::{Atoms, Block, BlockHeader, BlockInfo, ChainInfo, Tx};

/// Chain queries the indexer needs from a node.
///
/// Implementations handle authentication, connection management and response
/// decoding internally. Every method is safe to call concurrently.
#[async_trait]
pub trait ChainBackend: Send + Sync {
    /// Chain name, heights, difficulty and node version in one record.
    async fn get_chain_info(&self) -> Result<ChainInfo, CoreError>;

    async fn get_best_block_hash(&self) -> Result<String, CoreError>;

    async fn get_best_block_height(&self) -> Result<u32, CoreError>;

    async fn get_block_hash(&self, height: u32) -> Result<String, CoreError>;

    async fn get_block_header(&self, hash: &str) -> Result<BlockHeader, CoreError>;

    async fn get_block_header_by_height(&self, height: u32) -> Result<BlockHeader, CoreError> {
        let hash = self.get_block_hash(height).await?;
        self.get_block_header(&hash).await
    }

    /// Fetch a block with all of its regular-tree transactions parsed.
    ///
    /// `hash` wins when present and non-empty; otherwise `height` is resolved
    /// to a hash first. The first transaction that fails aborts the block.
    async fn get_block(&self, hash: Option<&str>, height: u32) -> Result<Block, CoreError>;

    /// Block header and transaction ids, without fetching the transactions.
    async fn get_block_info(&self, hash: &str) -> Result<BlockInfo, CoreError>;

    async fn get_transaction(&self, txid: &str) -> Result<Tx, CoreError>;

    /// The node's canonical JSON for `tx`, as bytes.
    async fn get_transaction_specific(&self, tx: &Tx) -> Result<Vec<u8>, CoreError>;

    /// Fee per kB for confirmation within `blocks`.
    ///
    /// When the node cannot be reached, its reply cannot be decoded, or the
    /// reply carries no result, this reports [`Atoms::ZERO`] as success. Only
    /// an error the node returns in the envelope becomes `Err`.
    async fn estimate_smart_fee(
        &self,
        blocks: u32,
        conservative: bool,
    ) -> Result<Atoms, CoreError>;

    /// Fee per kB from the node's flat estimator. Every failure is an error.
    async fn estimate_fee(&self, blocks: u32) -> Result<Atoms, CoreError>;

    /// Broadcast a hex-encoded transaction and return its txid.
    async fn send_raw_transaction(&self, hex: &str) -> Result<String, CoreError>;
}
