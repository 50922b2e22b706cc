#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("transaction id missing")]
    TxidMissing,

    #[error("transaction not found: {0}")]
    TxNotFound(String),

    #[error("txid {txid}: {source}")]
    TxParse {
        txid: String,
        #[source]
        source: Box<CoreError>,
    },

    #[error("invalid transaction data: {0}")]
    InvalidTxData(String),

    #[error("invalid block data: {0}")]
    InvalidBlockData(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Failures of a single JSON-RPC round-trip.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("encode JSON-RPC request: {0}")]
    Encode(#[source] serde_json::Error),

    /// No response reached us (connect, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Transport(String),

    /// A non-200 response whose body was not a decodable envelope either.
    #[error("HTTP status {status}: {source}")]
    HttpStatus {
        status: u16,
        #[source]
        source: Box<RpcError>,
    },

    /// The body could not be decoded into the expected envelope.
    #[error("{message}")]
    Decode {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Decoding unwound; recovered at the decode boundary.
    #[error("{message}")]
    DecodeFault { message: String, reason: String },

    /// The node answered with a non-empty `error.message`.
    #[error("{context}: {message}")]
    Server {
        context: &'static str,
        code: i64,
        message: String,
    },

    #[error("{context}: missing result")]
    MissingResult { context: &'static str },
}

impl RpcError {
    /// True when the node itself reported the failure: an envelope with a
    /// non-empty `error.message`. A missing result is not one.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}
