//! HTTP(S) transport for the node's JSON-RPC endpoint.
//!
//! Implements [`RpcTransport`](super::RpcTransport) over `reqwest` with basic
//! auth, a keep-alive connection pool, optional extra TLS root, and optional
//! request rate limiting.

mod client;
mod connection;

pub use client::{HttpTransport, MAX_IDLE_PER_HOST, POOL_IDLE_TIMEOUT};
