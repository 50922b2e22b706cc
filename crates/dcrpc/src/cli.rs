use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// dcrpc: chain queries against a Decred node's JSON-RPC interface.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct RpcArgs {
    /// Backend configuration file (JSON with `rpc_url`, `rpc_user`, ...).
    /// Flags given on the command line override its values.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// dcrd RPC URL.
    #[arg(long, global = true, env = "DCRPC_RPC_URL")]
    pub rpc_url: Option<String>,

    /// RPC username.
    #[arg(long, global = true, env = "DCRPC_RPC_USER")]
    pub rpc_user: Option<String>,

    /// RPC password.
    #[arg(long, global = true, env = "DCRPC_RPC_PASS")]
    pub rpc_pass: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    pub rpc_timeout: Option<u64>,

    /// PEM certificate to trust, usually dcrd's `rpc.cert`.
    #[arg(long, global = true)]
    pub rpc_cert: Option<PathBuf>,

    /// Skip TLS certificate verification.
    #[arg(long, global = true)]
    pub rpc_insecure: bool,

    /// Maximum requests per second sent to the node.
    #[arg(long, global = true)]
    pub rpc_rate_limit: Option<u32>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Chain name, heights and node version.
    Info,

    /// Hash and height of the chain tip.
    BestBlock,

    /// Hash of the block at HEIGHT.
    BlockHash { height: u32 },

    /// Block header by hash, or by height with --height.
    Header {
        hash: Option<String>,
        #[arg(long, conflicts_with = "hash")]
        height: Option<u32>,
    },

    /// Block with every transaction fetched and parsed.
    Block {
        hash: Option<String>,
        #[arg(long, required_unless_present = "hash")]
        height: Option<u32>,
    },

    /// Block header and transaction ids only.
    BlockInfo { hash: String },

    /// Parsed transaction.
    Tx { txid: String },

    /// The node's canonical transaction JSON.
    TxRaw { txid: String },

    /// Flat fee estimate in atoms per kB.
    EstimateFee {
        #[arg(long, default_value = "6")]
        blocks: u32,
    },

    /// Smart fee estimate in atoms per kB; 0 when the node cannot answer.
    EstimateSmartFee {
        #[arg(long, default_value = "6")]
        blocks: u32,
        #[arg(long)]
        conservative: bool,
    },

    /// Broadcast a hex-encoded transaction.
    Send { hex: String },
}
