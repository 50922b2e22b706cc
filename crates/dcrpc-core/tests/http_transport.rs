use std::time::{Duration, Instant};

use dcrpc_core::rpc::{ChainBackend, DecredRpc};
use dcrpc_core::types::Atoms;
use dcrpc_core::{CoreError, RpcConfig, RpcError};
use httpmock::prelude::*;
use serde_json::json;

// "rpc:pass"
const BASIC_AUTH: &str = "Basic cnBjOnBhc3M=";

fn config_for(server: &MockServer) -> RpcConfig {
    RpcConfig::new(server.base_url()).with_credentials("rpc", "pass")
}

fn method_marker(method: &str) -> String {
    format!("\"method\":\"{method}\"")
}

async fn mock_chain_info(server: &MockServer, chain: &str) {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .header("authorization", BASIC_AUTH)
                .body_contains(method_marker("getblockchaininfo"));
            then.status(200).json_body(json!({
                "id": 1,
                "result": {
                    "chain": chain,
                    "blocks": 120,
                    "headers": 120,
                    "syncheight": 120,
                    "bestblockhash": "tip",
                    "difficulty": 1.0
                },
                "error": null
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains(method_marker("getinfo"));
            then.status(200).json_body(json!({
                "id": 2,
                "result": {"version": 1080000, "protocolversion": 9, "timeoffset": 0},
                "error": null
            }));
        })
        .await;
}

#[tokio::test]
async fn connect_sends_json_rpc_1_commands_with_basic_auth() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .header("authorization", BASIC_AUTH)
                .header("content-type", "application/json")
                .json_body(json!({"id": 1, "method": "getblockchaininfo"}));
            then.status(200).json_body(json!({
                "id": 1,
                "result": {"chain": "simnet", "blocks": 5},
                "error": null
            }));
        })
        .await;
    let info = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .json_body(json!({"id": 2, "method": "getinfo"}));
            then.status(200).json_body(json!({
                "id": 2,
                "result": {"version": 1080000, "protocolversion": 9},
                "error": null
            }));
        })
        .await;

    let rpc = DecredRpc::connect(&config_for(&server))
        .await
        .expect("connect must succeed");

    info.assert_async().await;
    assert_eq!(rpc.chain_params().name, "simnet");
    assert_eq!(rpc.network(), "testnet");
}

#[tokio::test]
async fn positional_params_are_sent_in_order() {
    let server = MockServer::start_async().await;
    mock_chain_info(&server, "mainnet").await;
    let raw = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .json_body_partial(r#"{"method": "getrawtransaction", "params": ["abcd", 1]}"#);
            then.status(200).json_body(json!({
                "id": 3,
                "result": {
                    "txid": "abcd",
                    "hex": "0100",
                    "version": 1,
                    "vin": [],
                    "vout": [{
                        "value": 2.5,
                        "n": 0,
                        "version": 0,
                        "scriptPubKey": {"hex": "76a9", "type": "pubkeyhash"}
                    }],
                    "confirmations": 2
                },
                "error": null
            }));
        })
        .await;

    let rpc = DecredRpc::connect(&config_for(&server))
        .await
        .expect("connect must succeed");
    let tx = rpc
        .get_transaction("abcd")
        .await
        .expect("transaction must parse");

    raw.assert_async().await;
    assert_eq!(tx.txid, "abcd");
    assert_eq!(tx.vout[0].value, Atoms(250_000_000));
}

#[tokio::test]
async fn error_envelope_on_http_500_is_a_node_error() {
    let server = MockServer::start_async().await;
    mock_chain_info(&server, "mainnet").await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains(method_marker("getblockhash"));
            then.status(500).json_body(json!({
                "id": 3,
                "result": null,
                "error": {"code": -8, "message": "Block number out of range"}
            }));
        })
        .await;

    let rpc = DecredRpc::connect(&config_for(&server))
        .await
        .expect("connect must succeed");
    let err = rpc.get_block_hash(99_999_999).await.expect_err("must fail");

    assert!(matches!(
        err,
        CoreError::Rpc(RpcError::Server { code: -8, .. })
    ));
    assert_eq!(
        err.to_string(),
        "error fetching block hash: Block number out of range"
    );
}

#[tokio::test]
async fn wrong_credentials_surface_the_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(401).body("Unauthorized");
        })
        .await;

    let config = RpcConfig::new(server.base_url()).with_credentials("rpc", "nope");
    let err = DecredRpc::connect(&config)
        .await
        .err()
        .expect("401 must fail initialization");

    assert!(matches!(
        err,
        CoreError::Rpc(RpcError::HttpStatus { status: 401, .. })
    ));
    assert_eq!(err.to_string(), "HTTP status 401: Error: Unauthorized");
}

#[tokio::test]
async fn smart_fee_is_zero_when_the_body_is_garbage() {
    let server = MockServer::start_async().await;
    mock_chain_info(&server, "mainnet").await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains(method_marker("estimatesmartfee"));
            then.status(200).body("<html>proxy error</html>");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains(method_marker("estimatefee"));
            then.status(200).body("<html>proxy error</html>");
        })
        .await;

    let rpc = DecredRpc::connect(&config_for(&server))
        .await
        .expect("connect must succeed");

    assert_eq!(
        rpc.estimate_smart_fee(6, true)
            .await
            .expect("smart fee swallows decode failures"),
        Atoms::ZERO
    );
    let err = rpc
        .estimate_fee(6)
        .await
        .expect_err("flat fee reports decode failures");
    assert_eq!(err.to_string(), "Error: <html>proxy error</html>");
}

#[tokio::test]
async fn slow_node_hits_the_request_timeout() {
    let server = MockServer::start_async().await;
    mock_chain_info(&server, "mainnet").await;
    for method in ["getblockhash", "estimatesmartfee", "estimatefee"] {
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .body_contains(method_marker(method));
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(json!({"id": 3, "result": 0.0001, "error": null}));
            })
            .await;
    }

    let mut config = config_for(&server);
    config.rpc_timeout = 1;
    let rpc = DecredRpc::connect(&config)
        .await
        .expect("connect must succeed");

    let started = Instant::now();
    let err = rpc
        .get_block_hash(1)
        .await
        .expect_err("slow reply must time out");
    assert!(
        started.elapsed() < Duration::from_millis(2500),
        "request took {:?}",
        started.elapsed()
    );
    assert!(matches!(err, CoreError::Rpc(RpcError::Transport(_))));

    assert_eq!(
        rpc.estimate_smart_fee(6, true)
            .await
            .expect("smart fee swallows the timeout"),
        Atoms::ZERO
    );
    let err = rpc
        .estimate_fee(6)
        .await
        .expect_err("flat fee reports the timeout");
    assert!(matches!(err, CoreError::Rpc(RpcError::Transport(_))));
}

#[tokio::test]
async fn unreachable_node_is_a_transport_error() {
    let err = DecredRpc::connect(&RpcConfig::new("http://127.0.0.1:1"))
        .await
        .err()
        .expect("connect to a closed port must fail");

    assert!(matches!(err, CoreError::Rpc(RpcError::Transport(_))));
    assert!(err.to_string().starts_with("HTTP error: "));
}
