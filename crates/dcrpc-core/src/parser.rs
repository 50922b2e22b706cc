//! Transaction parsing and amount conversion.
//!
//! [`TxParser`] is the seam between the RPC adapter and whatever turns the
//! node's transaction JSON into domain [`Tx`] values. [`DecredParser`] is the
//! default implementation.

use bitcoin::{Denomination, SignedAmount};

use crate::error::CoreError;
use crate::rpc::types::{RawTx, Vin, Vout};
use crate::types::{Atoms, OutPoint, Tx, TxInput, TxOutput};

pub trait TxParser: Send + Sync {
    /// Parse the canonical JSON of one verbose raw transaction.
    fn parse_tx_from_json(&self, raw: &[u8]) -> Result<Tx, CoreError>;

    /// Convert a decimal coin amount (JSON number or string) into atoms.
    fn amount_to_atoms(&self, amount: &serde_json::Value) -> Result<Atoms, CoreError>;
}

/// Parser for the node's verbose transaction JSON.
///
/// Amounts are decimal DCR with eight fractional digits, the same scale as
/// the `bitcoin` crate's BTC denomination, whose exact decimal parsing is
/// reused here.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecredParser;

impl DecredParser {
    pub fn new() -> Self {
        Self
    }
}

impl TxParser for DecredParser {
    fn parse_tx_from_json(&self, raw: &[u8]) -> Result<Tx, CoreError> {
        let tx: RawTx = serde_json::from_slice(raw)
            .map_err(|e| CoreError::InvalidTxData(format!("invalid raw transaction JSON: {e}")))?;
        if tx.txid.is_empty() {
            return Err(CoreError::InvalidTxData("missing txid".into()));
        }

        let vin = tx.vin.iter().map(parse_vin).collect::<Result<Vec<_>, _>>()?;
        let vout = tx.vout.iter().map(parse_vout).collect::<Result<Vec<_>, _>>()?;

        let block_height = tx
            .blockheight
            .map(|h| {
                u32::try_from(h)
                    .map_err(|_| CoreError::InvalidTxData(format!("blockheight out of range: {h}")))
            })
            .transpose()?;

        Ok(Tx {
            txid: tx.txid,
            hex: tx.hex,
            version: tx.version,
            lock_time: tx.locktime,
            expiry: tx.expiry,
            vin,
            vout,
            block_hash: tx.blockhash.filter(|h| !h.is_empty()),
            block_height,
            block_index: tx.blockindex,
            confirmations: tx
                .confirmations
                .and_then(|c| u64::try_from(c).ok())
                .unwrap_or(0),
            time: tx.time,
            block_time: tx.blocktime,
        })
    }

    fn amount_to_atoms(&self, amount: &serde_json::Value) -> Result<Atoms, CoreError> {
        parse_dcr_amount(amount)
    }
}

fn parse_vin(input: &Vin) -> Result<TxInput, CoreError> {
    let coinbase = input.coinbase.clone().filter(|c| !c.is_empty());
    let stakebase = input.stakebase.clone().filter(|s| !s.is_empty());

    let prevout = if coinbase.is_some() || stakebase.is_some() {
        None
    } else {
        let txid = input
            .txid
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::InvalidTxData("missing vin.txid".into()))?;
        Some(OutPoint {
            txid,
            vout: input.vout,
        })
    };

    Ok(TxInput {
        prevout,
        coinbase,
        stakebase,
        tree: input.tree,
        sequence: input.sequence,
        amount_in: atoms_from_f64(input.amountin, "vin.amountin")?,
        script_sig_hex: input.scriptsig.as_ref().map(|s| s.hex.clone()),
    })
}

fn parse_vout(output: &Vout) -> Result<TxOutput, CoreError> {
    // Array position is the output index for the indexer; `n` is kept as
    // reported.
    Ok(TxOutput {
        value: atoms_from_f64(output.value, "vout.value")?,
        n: output.n,
        script_version: output.version,
        script_pub_key_hex: output.script_pub_key.hex.clone(),
        script_type: output.script_pub_key.kind.clone(),
        addresses: output.script_pub_key.addresses.clone(),
    })
}

fn atoms_from_f64(value: f64, field: &str) -> Result<Atoms, CoreError> {
    SignedAmount::from_float_in(value, Denomination::Bitcoin)
        .map(|a| Atoms(a.to_sat()))
        .map_err(|e| CoreError::InvalidTxData(format!("invalid {field} `{value}`: {e}")))
}

/// Parse a DCR amount from a JSON value.
///
/// Numbers are parsed from their decimal text so values like `0.0001` stay
/// exact; scientific notation falls back to float conversion. Strings must be
/// plain decimals.
pub fn parse_dcr_amount(value: &serde_json::Value) -> Result<Atoms, CoreError> {
    match value {
        serde_json::Value::Number(n) => {
            let text = n.to_string();
            if let Ok(amount) = SignedAmount::from_str_in(&text, Denomination::Bitcoin) {
                return Ok(Atoms(amount.to_sat()));
            }
            let parsed = n
                .as_f64()
                .ok_or_else(|| CoreError::InvalidTxData(format!("invalid DCR amount `{value}`")))?;
            atoms_from_f64(parsed, "DCR amount")
        }
        serde_json::Value::String(s) => SignedAmount::from_str_in(s, Denomination::Bitcoin)
            .map(|a| Atoms(a.to_sat()))
            .map_err(|e| CoreError::InvalidTxData(format!("invalid DCR amount `{s}`: {e}"))),
        _ => Err(CoreError::InvalidTxData(format!(
            "expected numeric DCR amount, got: {value}"
        ))),
    }
}
