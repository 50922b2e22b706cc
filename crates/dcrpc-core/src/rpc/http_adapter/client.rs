use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{header, Url};
use tracing::{debug, trace};

use crate::config::RpcConfig;
use crate::error::{CoreError, RpcError};

use super::super::transport::{RawResponse, RpcTransport};
use super::connection::{parse_connection, resolve_auth, validate_timeout};

/// How long an idle pooled connection (and its TCP keep-alive) is kept.
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Idle connections kept per host. Set high so bursts of concurrent calls
/// reuse sockets instead of exhausting ephemeral ports.
pub const MAX_IDLE_PER_HOST: usize = 100;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// JSON-RPC transport over HTTP(S) with basic auth and a pooled client.
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    auth: Option<(String, String)>,
    limiter: Option<DirectRateLimiter>,
}

impl HttpTransport {
    /// Build the transport from backend configuration.
    ///
    /// TLS: `rpc_ca_cert` adds a PEM root (the node's self-signed `rpc.cert`);
    /// `rpc_accept_invalid_certs` disables verification entirely.
    ///
    /// If `rpc_requests_per_second` is set, every outbound HTTP request
    /// waits for a permit first.
    pub fn new(config: &RpcConfig) -> Result<Self, CoreError> {
        let url = parse_connection(&config.rpc_url)?;
        let auth = resolve_auth(config.rpc_user.as_deref(), config.rpc_pass.as_deref())?;
        validate_timeout(config.rpc_timeout)?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout())
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .tcp_keepalive(POOL_IDLE_TIMEOUT)
            .tcp_nodelay(true);

        if let Some(path) = &config.rpc_ca_cert {
            let pem = std::fs::read(path).map_err(|e| {
                CoreError::Config(format!("read rpc certificate {}: {e}", path.display()))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                CoreError::Config(format!("parse rpc certificate {}: {e}", path.display()))
            })?;
            builder = builder.add_root_certificate(cert);
        }
        if config.rpc_accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| CoreError::Config(format!("build HTTP client: {e}")))?;

        let limiter = match config.rpc_requests_per_second {
            None => None,
            Some(limit) => {
                let limit = NonZeroU32::new(limit).ok_or_else(|| {
                    CoreError::Config("rpc requests per second must be at least 1".to_owned())
                })?;
                Some(RateLimiter::direct(Quota::per_second(limit)))
            }
        };

        Ok(Self {
            client,
            url,
            auth,
            limiter,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn send(&self, method: &str, request: Vec<u8>) -> Result<RawResponse, RpcError> {
        self.wait_for_rate_limit().await;

        let mut builder = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(request);
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user, Some(pass));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RpcError::Transport(describe(&e)))?;
        let status = response.status();

        let body = response
            .bytes()
            .await
            .map_err(|e| RpcError::Transport(format!("read response body: {}", describe(&e))))?;
        debug!(rpc.method = method, %status, body_len = body.len(), "rpc response");
        trace!(rpc.method = method, body = %String::from_utf8_lossy(&body), "rpc response body");

        Ok(RawResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

// reqwest's Display stops at the outermost layer ("error sending request");
// the useful part (refused, DNS, TLS) sits further down the source chain.
fn describe(err: &reqwest::Error) -> String {
    use std::error::Error as _;

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
