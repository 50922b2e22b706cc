//! Wire shapes of the node's JSON-RPC results.
//!
//! The node's dialect differs from Bitcoin Core's (stake fields, `syncheight`,
//! `getinfo` instead of `getnetworkinfo`), so these are decoded leniently:
//! every struct takes `#[serde(default)]` and missing members become zero
//! values. Domain types built from them live in `crate::types`.

use serde::{Deserialize, Serialize};

// ==============================================================================
// Chain Status
// ==============================================================================

/// `getblockchaininfo`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockchainInfoResult {
    pub chain: String,
    pub blocks: i64,
    pub headers: i64,
    #[serde(rename = "syncheight")]
    pub sync_height: i64,
    #[serde(rename = "bestblockhash")]
    pub best_block_hash: String,
    /// Compact difficulty; some node versions report it as a float.
    pub difficulty: f64,
    #[serde(rename = "verificationprogress")]
    pub verification_progress: f64,
    #[serde(rename = "chainwork")]
    pub chain_work: String,
    #[serde(rename = "initialblockdownload")]
    pub initial_block_download: bool,
    #[serde(rename = "maxblocksize")]
    pub max_block_size: i64,
}

/// `getinfo`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InfoResult {
    pub version: i32,
    #[serde(rename = "protocolversion")]
    pub protocol_version: i32,
    pub blocks: i64,
    #[serde(rename = "timeoffset")]
    pub time_offset: i64,
    pub connections: i32,
    pub proxy: String,
    pub difficulty: f64,
    pub testnet: bool,
    #[serde(rename = "relayfee")]
    pub relay_fee: f64,
    pub errors: String,
}

/// `getbestblock`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BestBlockResult {
    pub hash: String,
    pub height: i64,
}

// ==============================================================================
// Blocks
// ==============================================================================

/// `getblock <hash>` in its default (non-verbose-tx) form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockResult {
    pub hash: String,
    pub confirmations: i64,
    pub size: i64,
    pub height: i64,
    pub version: serde_json::Value,
    #[serde(rename = "merkleroot")]
    pub merkle_root: String,
    #[serde(rename = "stakeroot")]
    pub stake_root: String,
    /// Only present when the node is asked for inlined transactions.
    #[serde(rename = "rawtx")]
    pub raw_tx: Vec<RawTx>,
    pub tx: Vec<String>,
    pub stx: Vec<String>,
    pub time: i64,
    pub nonce: serde_json::Value,
    #[serde(rename = "votebits")]
    pub vote_bits: u16,
    #[serde(rename = "finalstate")]
    pub final_state: String,
    pub voters: u16,
    #[serde(rename = "freshstake")]
    pub fresh_stake: u8,
    pub revocations: u8,
    #[serde(rename = "poolsize")]
    pub pool_size: u32,
    pub bits: String,
    #[serde(rename = "sbits")]
    pub stake_difficulty: f64,
    #[serde(rename = "extradata")]
    pub extra_data: String,
    #[serde(rename = "stakeversion")]
    pub stake_version: u32,
    pub difficulty: f64,
    #[serde(rename = "chainwork")]
    pub chain_work: String,
    #[serde(rename = "previousblockhash")]
    pub previous_hash: String,
    #[serde(rename = "nextblockhash")]
    pub next_hash: String,
}

/// `getblockheader <hash>`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockHeaderResult {
    pub hash: String,
    pub confirmations: i64,
    pub version: serde_json::Value,
    #[serde(rename = "merkleroot")]
    pub merkle_root: String,
    #[serde(rename = "stakeroot")]
    pub stake_root: String,
    pub height: u32,
    pub size: u32,
    pub time: i64,
    pub nonce: u32,
    pub bits: String,
    #[serde(rename = "sbits")]
    pub stake_difficulty: f64,
    pub difficulty: f64,
    #[serde(rename = "chainwork")]
    pub chain_work: String,
    #[serde(rename = "previousblockhash")]
    pub previous_hash: String,
    #[serde(rename = "nextblockhash")]
    pub next_hash: String,
}

// ==============================================================================
// Transactions
// ==============================================================================

/// Verbose `getrawtransaction` result.
///
/// Serialized back out as the canonical form handed to the transaction
/// parser, so optional members are skipped rather than written as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTx {
    pub hex: String,
    pub txid: String,
    pub version: i32,
    pub locktime: u32,
    pub vin: Vec<Vin>,
    pub vout: Vec<Vout>,
    pub expiry: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockhash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockheight: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockindex: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocktime: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stakebase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    pub vout: u32,
    pub tree: i8,
    pub sequence: u32,
    pub amountin: f64,
    pub blockheight: u32,
    pub blockindex: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scriptsig: Option<ScriptSig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSig {
    pub asm: String,
    pub hex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vout {
    pub value: f64,
    pub n: u32,
    pub version: u16,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKeyResult,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptPubKeyResult {
    pub asm: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hex: String,
    #[serde(rename = "reqSigs", skip_serializing_if = "Option::is_none")]
    pub req_sigs: Option<i32>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
    #[serde(rename = "commitamt", skip_serializing_if = "Option::is_none")]
    pub commit_amount: Option<f64>,
}

// ==============================================================================
// Fees
// ==============================================================================

/// `estimatesmartfee`: older nodes answer with a bare rate, newer ones with
/// an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SmartFeeResult {
    Rate(f64),
    Detailed(EstimateSmartFeeResult),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EstimateSmartFeeResult {
    #[serde(rename = "feerate")]
    pub fee_rate: f64,
    pub errors: Vec<String>,
    pub blocks: i64,
}

impl SmartFeeResult {
    /// Fee rate in DCR/kB.
    pub fn fee_rate(&self) -> f64 {
        match self {
            Self::Rate(rate) => *rate,
            Self::Detailed(detail) => detail.fee_rate,
        }
    }
}
