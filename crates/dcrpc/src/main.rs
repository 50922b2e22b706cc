mod cli;

use std::fs;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde::Serialize;
use serde_json::json;

use dcrpc_core::rpc::{ChainBackend, DecredRpc};
use dcrpc_core::RpcConfig;

use cli::{Command, RpcArgs};

const DEFAULT_RPC_URL: &str = "https://127.0.0.1:9109";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = build_config(&args.rpc)?;

    // Initialization asks the node for its chain, so a bad URL or bad
    // credentials fail here rather than on the first query.
    let rpc = DecredRpc::connect(&config).await.map_err(|err| {
        let message = format_rpc_connect_error(&config.rpc_url, &err.to_string());
        eyre!(message).wrap_err("while attempting to connect to dcrd RPC")
    })?;

    tracing::info!(
        chain = rpc.chain_params().name,
        network = rpc.network(),
        "connected to dcrd"
    );

    run(&rpc, args.command).await
}

async fn run(rpc: &DecredRpc, command: Command) -> eyre::Result<()> {
    match command {
        Command::Info => {
            let info = rpc.get_chain_info().await.context("get chain info")?;
            print_json(&json!({
                "network": rpc.network(),
                "testnet": rpc.is_testnet(),
                "info": info,
            }))
        }
        Command::BestBlock => {
            let hash = rpc.get_best_block_hash().await.context("get best block hash")?;
            let height = rpc
                .get_best_block_height()
                .await
                .context("get best block height")?;
            print_json(&json!({ "hash": hash, "height": height }))
        }
        Command::BlockHash { height } => {
            let hash = rpc
                .get_block_hash(height)
                .await
                .with_context(|| format!("get block hash at height {height}"))?;
            print_json(&hash)
        }
        Command::Header { hash, height } => {
            let header = match (hash, height) {
                (Some(hash), _) => rpc.get_block_header(&hash).await,
                (None, Some(height)) => rpc.get_block_header_by_height(height).await,
                (None, None) => return Err(eyre!("give a block hash or --height")),
            }
            .context("get block header")?;
            print_json(&header)
        }
        Command::Block { hash, height } => {
            let block = rpc
                .get_block(hash.as_deref(), height.unwrap_or(0))
                .await
                .context("get block")?;
            print_json(&block)
        }
        Command::BlockInfo { hash } => {
            let info = rpc
                .get_block_info(&hash)
                .await
                .with_context(|| format!("get block info for {hash}"))?;
            print_json(&info)
        }
        Command::Tx { txid } => {
            let tx = rpc
                .get_transaction(&txid)
                .await
                .with_context(|| format!("get transaction {txid}"))?;
            print_json(&tx)
        }
        Command::TxRaw { txid } => {
            let tx = rpc
                .get_transaction(&txid)
                .await
                .with_context(|| format!("get transaction {txid}"))?;
            let raw = rpc
                .get_transaction_specific(&tx)
                .await
                .context("get canonical transaction JSON")?;
            println!("{}", String::from_utf8_lossy(&raw));
            Ok(())
        }
        Command::EstimateFee { blocks } => {
            let fee = rpc.estimate_fee(blocks).await.context("estimate fee")?;
            print_json(&json!({ "blocks": blocks, "atoms_per_kb": fee }))
        }
        Command::EstimateSmartFee {
            blocks,
            conservative,
        } => {
            let fee = rpc
                .estimate_smart_fee(blocks, conservative)
                .await
                .context("estimate smart fee")?;
            print_json(&json!({ "blocks": blocks, "atoms_per_kb": fee }))
        }
        Command::Send { hex } => {
            let txid = rpc
                .send_raw_transaction(&hex)
                .await
                .context("send raw transaction")?;
            print_json(&txid)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> eyre::Result<()> {
    let text = serde_json::to_string_pretty(value).context("encode output")?;
    println!("{text}");
    Ok(())
}

/// Start from the config file when given, then let flags and environment
/// override individual keys.
fn build_config(args: &RpcArgs) -> eyre::Result<RpcConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read config file {}", path.display()))?;
            RpcConfig::from_json(&text)
                .with_context(|| format!("parse config file {}", path.display()))?
        }
        None => RpcConfig::new(DEFAULT_RPC_URL),
    };

    if let Some(url) = &args.rpc_url {
        config.rpc_url = url.clone();
    }
    if let Some(user) = &args.rpc_user {
        config.rpc_user = Some(user.clone());
    }
    if let Some(pass) = &args.rpc_pass {
        config.rpc_pass = Some(pass.clone());
    }
    if let Some(timeout) = args.rpc_timeout {
        config.rpc_timeout = timeout;
    }
    if let Some(cert) = &args.rpc_cert {
        config.rpc_ca_cert = Some(cert.clone());
    }
    if args.rpc_insecure {
        config.rpc_accept_invalid_certs = true;
    }
    if let Some(rate) = args.rpc_rate_limit {
        config.rpc_requests_per_second = Some(rate);
    }

    Ok(config)
}

fn format_rpc_connect_error(rpc_url: &str, source_error: &str) -> String {
    let mut lines = vec![
        format!("could not connect to RPC endpoint `{rpc_url}`"),
        format!("RPC error: {source_error}"),
    ];

    if source_error.contains("dns error") || source_error.contains("failed to lookup address") {
        lines.push(
            "hint: hostname resolution failed; verify the endpoint hostname and your DNS/network"
                .into(),
        );
    } else if source_error.contains("certificate")
        || source_error.contains("tls")
        || source_error.contains("InvalidContentType")
    {
        lines.push(
            "hint: TLS handshake failed; pass dcrd's rpc.cert with --rpc-cert, or use http:// if dcrd runs with --notls"
                .into(),
        );
    } else if source_error.contains("HTTP status 401") || source_error.contains("HTTP status 403")
    {
        lines.push("hint: authentication failed; verify --rpc-user/--rpc-pass".into());
    } else if source_error.contains("Connection refused") {
        lines.push(
            "hint: nothing is listening there; check that dcrd is running and its --rpclisten address"
                .into(),
        );
    } else if source_error.contains("operation timed out") {
        lines.push("hint: the node did not answer in time; raise --rpc-timeout".into());
    }

    lines.join("\n")
}
