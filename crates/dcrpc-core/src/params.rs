//! Chain parameters keyed by the chain name the node reports.

pub const MAINNET_MAGIC: u32 = 0xd9b4_00f9;
pub const TESTNET3_MAGIC: u32 = 0xb194_aa75;
pub const SIMNET_MAGIC: u32 = 0x1214_1c16;
pub const REGNET_MAGIC: u32 = 0xdab5_00fa;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParams {
    pub name: &'static str,
    /// Network magic.
    pub net: u32,
}

pub static MAINNET: ChainParams = ChainParams {
    name: "mainnet",
    net: MAINNET_MAGIC,
};

pub static TESTNET3: ChainParams = ChainParams {
    name: "testnet3",
    net: TESTNET3_MAGIC,
};

pub static SIMNET: ChainParams = ChainParams {
    name: "simnet",
    net: SIMNET_MAGIC,
};

pub static REGNET: ChainParams = ChainParams {
    name: "regnet",
    net: REGNET_MAGIC,
};

/// Look up parameters by chain name. Unknown names fall back to mainnet.
pub fn chain_params(chain: &str) -> &'static ChainParams {
    match chain {
        "testnet3" => &TESTNET3,
        "simnet" => &SIMNET,
        "regnet" => &REGNET,
        "mainnet" => &MAINNET,
        other => {
            tracing::warn!(chain = other, "unknown chain name; using mainnet parameters");
            &MAINNET
        }
    }
}

impl ChainParams {
    pub fn is_mainnet(&self) -> bool {
        self.net == MAINNET_MAGIC
    }

    /// Network label the indexer expects: `livenet` or `testnet`.
    pub fn network_label(&self) -> &'static str {
        if self.is_mainnet() {
            "livenet"
        } else {
            "testnet"
        }
    }
}
