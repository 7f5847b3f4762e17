use serde::{Deserialize, Serialize};

use crate::NetworkId;

/// A cross-chain order placed with the swap aggregator
///
/// Secrets are generated per run and never reused.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainOrder {
    pub order_hash: String,

    /// `0x`-prefixed 32-byte secrets, one per fill segment
    pub secrets: Vec<String>,

    /// keccak256 of each secret, same order as `secrets`
    pub secret_hashes: Vec<String>,

    /// Hash-lock value committed to by the order
    pub hash_lock: String,

    pub src_chain: NetworkId,
    pub dst_chain: NetworkId,
    pub src_token: String,
    pub dst_token: String,

    /// Amount in source-token base units
    pub amount: String,

    pub maker: String,
}

impl CrossChainOrder {
    pub fn is_multi_fill(&self) -> bool {
        self.secrets.len() > 1
    }
}
