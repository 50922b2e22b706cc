//! Domain types handed to the indexer.
//!
//! Everything here is transient: built for one request and owned by the
//! caller afterwards. Wire shapes of the node's responses live in
//! `crate::rpc::types` instead.

use serde::{Deserialize, Serialize};

// ==============================================================================
// Atoms
// ==============================================================================

/// An amount in atoms, the smallest Decred unit (1 DCR = 10^8 atoms).
///
/// `#[serde(transparent)]` keeps the JSON form a bare integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Atoms(pub i64);

impl Atoms {
    pub const ZERO: Atoms = Atoms(0);
}

impl std::fmt::Display for Atoms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} atoms", self.0)
    }
}

// ==============================================================================
// Chain Info
// ==============================================================================

/// Normalized chain status merged from `getblockchaininfo` and `getinfo`.
///
/// `subversion` and `warnings` are always empty: the node reports neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub chain: String,
    pub blocks: i64,
    pub headers: i64,
    pub best_block_hash: String,
    pub difficulty: String,
    pub sync_height: i64,
    pub version: String,
    pub subversion: String,
    pub protocol_version: String,
    pub time_offset: f64,
    pub warnings: String,
}

// ==============================================================================
// Blocks
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub hash: String,
    pub prev: String,
    pub next: String,
    pub height: u32,
    pub confirmations: i64,
    pub size: u32,
    pub time: i64,
}

/// A block whose every listed transaction has been fetched and parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub txs: Vec<Tx>,
}

/// Block header plus bare transaction ids, without resolving them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub header: BlockHeader,
    pub merkle_root: String,
    pub version: String,
    pub nonce: String,
    pub bits: String,
    pub difficulty: f64,
    pub txids: Vec<String>,
}

// ==============================================================================
// Transactions
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tx {
    pub txid: String,
    pub hex: String,
    pub version: i32,
    pub lock_time: u32,
    pub expiry: u32,
    pub vin: Vec<TxInput>,
    pub vout: Vec<TxOutput>,
    pub block_hash: Option<String>,
    pub block_height: Option<u32>,
    pub block_index: Option<u32>,
    pub confirmations: u64,
    pub time: Option<i64>,
    pub block_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// `None` for coinbase and stakebase inputs.
    pub prevout: Option<OutPoint>,
    pub coinbase: Option<String>,
    pub stakebase: Option<String>,
    pub tree: i8,
    pub sequence: u32,
    pub amount_in: Atoms,
    pub script_sig_hex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: String,
    pub vout: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub value: Atoms,
    pub n: u32,
    pub script_version: u16,
    pub script_pub_key_hex: String,
    pub script_type: String,
    pub addresses: Vec<String>,
}

impl TxInput {
    pub fn is_coinbase(&self) -> bool {
        self.coinbase.is_some()
    }
}
