use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::RpcConfig;
use crate::error::{CoreError, RpcError};
use crate::params::{chain_params, ChainParams};
use crate::parser::{DecredParser, TxParser};
use crate::types::{Atoms, Block, BlockHeader, BlockInfo, ChainInfo, Tx};

use super::client::RpcClient;
use super::decode::{DecodeObserver, TracingObserver};
use super::http_adapter::HttpTransport;
use super::types::{
    BestBlockResult, BlockHeaderResult, BlockResult, BlockchainInfoResult, InfoResult, RawTx,
    SmartFeeResult,
};
use super::ChainBackend;

/// dcrd's code for "No information available about transaction".
const RPC_NO_TX_INFO: i64 = -5;

/// Chain queries against a Decred node.
///
/// Composes an [`RpcClient`] (transport + safe decoding) with a
/// [`TxParser`] and the chain parameters selected when the adapter was
/// initialized. All three are fixed for the adapter's lifetime.
pub struct DecredRpc {
    client: RpcClient,
    parser: Arc<dyn TxParser>,
    params: &'static ChainParams,
}

impl DecredRpc {
    /// Assemble an adapter from parts without contacting the node.
    pub fn new(
        client: RpcClient,
        parser: Arc<dyn TxParser>,
        params: &'static ChainParams,
    ) -> Self {
        Self {
            client,
            parser,
            params,
        }
    }

    /// Connect over HTTP and initialize from the node's chain info.
    pub async fn connect(config: &RpcConfig) -> Result<Self, CoreError> {
        Self::connect_with_observer(config, Arc::new(TracingObserver)).await
    }

    pub async fn connect_with_observer(
        config: &RpcConfig,
        observer: Arc<dyn DecodeObserver>,
    ) -> Result<Self, CoreError> {
        let transport = HttpTransport::new(config)?;
        debug!(rpc.url = %transport.url(), "connecting to node");
        Self::initialize(RpcClient::new(Arc::new(transport), observer)).await
    }

    /// Ask the node which chain it follows, then pick parameters and build
    /// the parser once.
    pub async fn initialize(client: RpcClient) -> Result<Self, CoreError> {
        let chain_info = fetch_chain_info(&client).await?;
        let params = chain_params(&chain_info.chain);
        info!(
            chain = %chain_info.chain,
            net = params.name,
            network = params.network_label(),
            blocks = chain_info.blocks,
            "rpc: block chain"
        );
        Ok(Self::new(client, Arc::new(DecredParser::new()), params))
    }

    pub fn chain_params(&self) -> &'static ChainParams {
        self.params
    }

    pub fn is_testnet(&self) -> bool {
        !self.params.is_mainnet()
    }

    /// `livenet` or `testnet`.
    pub fn network(&self) -> &'static str {
        self.params.network_label()
    }

    async fn get_best_block(&self) -> Result<BestBlockResult, CoreError> {
        Ok(self
            .client
            .call_result("error fetching best block", "getbestblock", Vec::new())
            .await?)
    }

    async fn fetch_block(&self, hash: &str) -> Result<BlockResult, CoreError> {
        Ok(self
            .client
            .call_result("error fetching block info", "getblock", vec![json!(hash)])
            .await?)
    }

    /// Canonical JSON bytes of one verbose transaction, as the parser takes it.
    async fn get_raw_transaction(&self, txid: &str) -> Result<Vec<u8>, CoreError> {
        if txid.is_empty() {
            return Err(CoreError::TxidMissing);
        }

        let raw: RawTx = self
            .client
            .call_result(
                "error fetching transaction",
                "getrawtransaction",
                vec![json!(txid), json!(1)],
            )
            .await
            .map_err(|err| normalize_getrawtransaction_error(txid, err))?;

        serde_json::to_vec(&raw).map_err(|e| CoreError::TxParse {
            txid: txid.to_owned(),
            source: Box::new(CoreError::InvalidTxData(format!(
                "re-encode raw transaction: {e}"
            ))),
        })
    }
}

#[async_trait]
impl ChainBackend for DecredRpc {
    async fn get_chain_info(&self) -> Result<ChainInfo, CoreError> {
        fetch_chain_info(&self.client).await
    }

    async fn get_best_block_hash(&self) -> Result<String, CoreError> {
        Ok(self.get_best_block().await?.hash)
    }

    async fn get_best_block_height(&self) -> Result<u32, CoreError> {
        let height = self.get_best_block().await?.height;
        height_from_node(height)
    }

    async fn get_block_hash(&self, height: u32) -> Result<String, CoreError> {
        Ok(self
            .client
            .call_result(
                "error fetching block hash",
                "getblockhash",
                vec![json!(height)],
            )
            .await?)
    }

    async fn get_block_header(&self, hash: &str) -> Result<BlockHeader, CoreError> {
        let header: BlockHeaderResult = self
            .client
            .call_result(
                "error fetching block header",
                "getblockheader",
                vec![json!(hash)],
            )
            .await?;

        Ok(BlockHeader {
            hash: header.hash,
            prev: header.previous_hash,
            next: header.next_hash,
            height: header.height,
            confirmations: header.confirmations,
            size: header.size,
            time: header.time,
        })
    }

    async fn get_block(&self, hash: Option<&str>, height: u32) -> Result<Block, CoreError> {
        let hash = match hash.filter(|h| !h.is_empty()) {
            Some(hash) => hash.to_owned(),
            None => self.get_block_hash(height).await?,
        };

        let block = self.fetch_block(&hash).await?;
        let header = header_from_block(&block)?;

        // The genesis coinbase cannot be fetched through getrawtransaction.
        if header.height == 0 {
            debug!(block.hash = %header.hash, "genesis block; not resolving transactions");
            return Ok(Block {
                header,
                txs: Vec::new(),
            });
        }

        let mut txs = Vec::with_capacity(block.tx.len());
        for txid in &block.tx {
            txs.push(self.get_transaction(txid).await?);
        }
        debug!(
            block.hash = %header.hash,
            block.height = header.height,
            tx_count = txs.len(),
            "block assembled"
        );

        Ok(Block { header, txs })
    }

    async fn get_block_info(&self, hash: &str) -> Result<BlockInfo, CoreError> {
        let block = self.fetch_block(hash).await?;
        let header = header_from_block(&block)?;

        Ok(BlockInfo {
            header,
            merkle_root: block.merkle_root,
            version: json_scalar_to_string(&block.version),
            nonce: json_scalar_to_string(&block.nonce),
            bits: block.bits,
            difficulty: block.difficulty,
            txids: block.tx,
        })
    }

    async fn get_transaction(&self, txid: &str) -> Result<Tx, CoreError> {
        let raw = self.get_raw_transaction(txid).await?;
        self.parser
            .parse_tx_from_json(&raw)
            .map_err(|e| CoreError::TxParse {
                txid: txid.to_owned(),
                source: Box::new(e),
            })
    }

    async fn get_transaction_specific(&self, tx: &Tx) -> Result<Vec<u8>, CoreError> {
        self.get_raw_transaction(&tx.txid).await
    }

    async fn estimate_smart_fee(
        &self,
        blocks: u32,
        conservative: bool,
    ) -> Result<Atoms, CoreError> {
        // Transport, decode and missing-result failures are reported as a
        // zero fee, unlike estimate_fee; only an error from the node itself
        // is returned.
        let result: SmartFeeResult = match self
            .client
            .call_result(
                "error fetching smart fee estimate",
                "estimatesmartfee",
                vec![json!(blocks)],
            )
            .await
        {
            Ok(result) => result,
            Err(err) if err.is_application() => return Err(err.into()),
            Err(err) => {
                warn!(
                    blocks,
                    conservative,
                    error = %err,
                    "estimatesmartfee failed; reporting zero fee"
                );
                return Ok(Atoms::ZERO);
            }
        };

        self.parser.amount_to_atoms(&json!(result.fee_rate()))
    }

    async fn estimate_fee(&self, blocks: u32) -> Result<Atoms, CoreError> {
        let rate: serde_json::Value = self
            .client
            .call_result("error fetching fee estimate", "estimatefee", vec![json!(blocks)])
            .await?;
        self.parser.amount_to_atoms(&rate)
    }

    async fn send_raw_transaction(&self, hex: &str) -> Result<String, CoreError> {
        Ok(self
            .client
            .call_result(
                "error sending transaction",
                "sendrawtransaction",
                vec![json!(hex)],
            )
            .await?)
    }
}

/// `getblockchaininfo` + `getinfo`, merged. Either call failing fails the
/// whole lookup.
async fn fetch_chain_info(client: &RpcClient) -> Result<ChainInfo, CoreError> {
    let chain: BlockchainInfoResult = client
        .call_result(
            "error fetching blockchain info",
            "getblockchaininfo",
            Vec::new(),
        )
        .await?;
    let node: InfoResult = client
        .call_result("error fetching network info", "getinfo", Vec::new())
        .await?;

    Ok(ChainInfo {
        chain: chain.chain,
        blocks: chain.blocks,
        headers: chain.headers,
        best_block_hash: chain.best_block_hash,
        difficulty: (chain.difficulty as i64).to_string(),
        sync_height: chain.sync_height,
        version: node.version.to_string(),
        subversion: String::new(),
        protocol_version: node.protocol_version.to_string(),
        time_offset: node.time_offset as f64,
        warnings: String::new(),
    })
}

fn header_from_block(block: &BlockResult) -> Result<BlockHeader, CoreError> {
    let size = u32::try_from(block.size).map_err(|_| {
        CoreError::InvalidBlockData(format!("block size out of range: {}", block.size))
    })?;
    Ok(BlockHeader {
        hash: block.hash.clone(),
        prev: block.previous_hash.clone(),
        next: block.next_hash.clone(),
        height: height_from_node(block.height)?,
        confirmations: block.confirmations,
        size,
        time: block.time,
    })
}

fn height_from_node(height: i64) -> Result<u32, CoreError> {
    u32::try_from(height)
        .map_err(|_| CoreError::InvalidBlockData(format!("block height out of range: {height}")))
}

// Version and nonce arrive as JSON numbers but are carried as text.
fn json_scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ==============================================================================
// RPC Error Normalization
// ==============================================================================

/// Map the node's "no information about transaction" answer to `TxNotFound`,
/// leaving every other failure as is.
fn normalize_getrawtransaction_error(txid: &str, err: RpcError) -> CoreError {
    match err {
        RpcError::Server { code, ref message, .. } if is_tx_not_found(code, message) => {
            CoreError::TxNotFound(txid.to_owned())
        }
        other => CoreError::Rpc(other),
    }
}

fn is_tx_not_found(code: i64, message: &str) -> bool {
    if code != RPC_NO_TX_INFO {
        return false;
    }

    let msg = message.to_ascii_lowercase();
    msg.contains("no information available") || msg.contains("not found")
}
