//! Backend connection settings.
//!
//! Key names match the indexer's backend configuration file, so the same
//! JSON document can be handed over verbatim. Keys this crate does not know
//! about are ignored.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::CoreError;

const DEFAULT_RPC_TIMEOUT_SECS: u64 = 25;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcConfig {
    pub rpc_url: String,
    #[serde(default)]
    pub rpc_user: Option<String>,
    #[serde(default)]
    pub rpc_pass: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_rpc_timeout")]
    pub rpc_timeout: u64,
    /// Extra PEM root certificate, typically the node's self-signed `rpc.cert`.
    #[serde(default)]
    pub rpc_ca_cert: Option<PathBuf>,
    #[serde(default)]
    pub rpc_accept_invalid_certs: bool,
    #[serde(default)]
    pub rpc_requests_per_second: Option<u32>,
}

fn default_rpc_timeout() -> u64 {
    DEFAULT_RPC_TIMEOUT_SECS
}

impl RpcConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            rpc_user: None,
            rpc_pass: None,
            rpc_timeout: DEFAULT_RPC_TIMEOUT_SECS,
            rpc_ca_cert: None,
            rpc_accept_invalid_certs: false,
            rpc_requests_per_second: None,
        }
    }

    pub fn with_credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.rpc_user = Some(user.into());
        self.rpc_pass = Some(pass.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("invalid backend configuration: {e}")))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout)
    }
}
