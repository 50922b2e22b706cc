pub mod config;
pub mod error;
pub mod params;
pub mod parser;
pub mod rpc;
#[cfg(test)]
mod test_util;
pub mod types;

pub use config::RpcConfig;
pub use error::{CoreError, RpcError};
pub use params::{chain_params, ChainParams};
pub use parser::{DecredParser, TxParser};
pub use rpc::{ChainBackend, DecredRpc};
