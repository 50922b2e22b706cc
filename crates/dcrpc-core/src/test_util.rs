//! Shared test fixtures for `dcrpc-core` unit tests.
//!
//! Node responses are built as `serde_json::Value` in the node's own field
//! names, so tests exercise the same decoding path as a live node.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::params::MAINNET;
use crate::parser::DecredParser;
use crate::rpc::mock::MockTransport;
use crate::rpc::{DecredRpc, RpcClient};

// ==============================================================================
// Node Results
// ==============================================================================

/// Verbose `getrawtransaction` result with one regular input and two outputs.
pub fn raw_tx_json(txid: &str, height: i64) -> Value {
    json!({
        "hex": format!("0100{txid}"),
        "txid": txid,
        "version": 1,
        "locktime": 0,
        "expiry": 0,
        "vin": [{
            "txid": "ff00",
            "vout": 1,
            "tree": 0,
            "sequence": 4294967295u32,
            "amountin": 1.5,
            "blockheight": 1100,
            "blockindex": 2,
            "scriptsig": {"asm": "sig", "hex": "4730"}
        }],
        "vout": [
            {
                "value": 1.0,
                "n": 0,
                "version": 0,
                "scriptPubKey": {
                    "asm": "OP_DUP",
                    "hex": "76a914",
                    "reqSigs": 1,
                    "type": "pubkeyhash",
                    "addresses": ["DsExample1"]
                }
            },
            {
                "value": 0.4999,
                "n": 1,
                "version": 0,
                "scriptPubKey": {
                    "asm": "OP_DUP",
                    "hex": "76a915",
                    "reqSigs": 1,
                    "type": "pubkeyhash",
                    "addresses": ["DsExample2"]
                }
            }
        ],
        "blockhash": format!("block{height}"),
        "blockheight": height,
        "blockindex": 1,
        "confirmations": 6,
        "time": 1_700_000_000,
        "blocktime": 1_700_000_000
    })
}

/// Verbose `getrawtransaction` result of a coinbase transaction.
pub fn coinbase_tx_json(txid: &str, height: i64) -> Value {
    json!({
        "hex": "01000000",
        "txid": txid,
        "version": 1,
        "locktime": 0,
        "expiry": 0,
        "vin": [{
            "coinbase": "0000",
            "sequence": 4294967295u32,
            "amountin": 10.0,
            "blockheight": 0,
            "blockindex": 4294967295u32
        }],
        "vout": [{
            "value": 10.0,
            "n": 0,
            "version": 0,
            "scriptPubKey": {"asm": "", "hex": "a914", "type": "scripthash"}
        }],
        "blockhash": format!("block{height}"),
        "blockheight": height,
        "confirmations": 1
    })
}

/// `getblock` result listing `txids` in the regular tree.
pub fn block_json(hash: &str, height: i64, txids: &[&str]) -> Value {
    json!({
        "hash": hash,
        "confirmations": 10,
        "size": 1500,
        "height": height,
        "version": 9,
        "merkleroot": "merkle",
        "stakeroot": "stake",
        "tx": txids,
        "stx": ["stake01"],
        "time": 1_700_000_000,
        "nonce": 123456,
        "votebits": 1,
        "voters": 5,
        "bits": "1a0b2c3d",
        "sbits": 150.5,
        "difficulty": 12345.5,
        "previousblockhash": "prev",
        "nextblockhash": "next"
    })
}

pub fn blockchain_info_json(chain: &str) -> Value {
    json!({
        "chain": chain,
        "blocks": 800000,
        "headers": 800005,
        "syncheight": 800005,
        "bestblockhash": "best",
        "difficulty": 470000000u32,
        "verificationprogress": 0.99,
        "chainwork": "00ff",
        "initialblockdownload": false,
        "maxblocksize": 393216
    })
}

pub fn info_json() -> Value {
    json!({
        "version": 1080000,
        "protocolversion": 9,
        "blocks": 800000,
        "timeoffset": -2,
        "connections": 8,
        "proxy": "",
        "difficulty": 1.0,
        "testnet": false,
        "relayfee": 0.0001,
        "errors": ""
    })
}

// ==============================================================================
// Adapter Builders
// ==============================================================================

/// A mainnet adapter over `mock`, skipping the initialization round-trips.
pub fn rpc_over(mock: MockTransport) -> (DecredRpc, Arc<MockTransport>) {
    let mock = Arc::new(mock);
    let rpc = DecredRpc::new(
        RpcClient::with_transport(mock.clone()),
        Arc::new(DecredParser::new()),
        &MAINNET,
    );
    (rpc, mock)
}
