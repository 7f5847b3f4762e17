use serde::{Deserialize, Serialize};
use std::fmt;

/// EVM networks supported by the cross-chain swap aggregator
///
/// Serialized as the numeric chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum NetworkId {
    Ethereum,
    Optimism,
    BinanceSmartChain,
    Gnosis,
    Polygon,
    Sonic,
    ZkSync,
    Coinbase,
    Arbitrum,
    Avalanche,
    Linea,
}

impl NetworkId {
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Optimism => 10,
            Self::BinanceSmartChain => 56,
            Self::Gnosis => 100,
            Self::Polygon => 137,
            Self::Sonic => 146,
            Self::ZkSync => 324,
            Self::Coinbase => 8453,
            Self::Arbitrum => 42161,
            Self::Avalanche => 43114,
            Self::Linea => 59144,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Optimism => "Optimism",
            Self::BinanceSmartChain => "BNB Chain",
            Self::Gnosis => "Gnosis",
            Self::Polygon => "Polygon",
            Self::Sonic => "Sonic",
            Self::ZkSync => "zkSync",
            Self::Coinbase => "Coinbase",
            Self::Arbitrum => "Arbitrum",
            Self::Avalanche => "Avalanche",
            Self::Linea => "Linea",
        }
    }
}

impl TryFrom<u64> for NetworkId {
    type Error = String;

    fn try_from(chain_id: u64) -> Result<Self, Self::Error> {
        let network = match chain_id {
            1 => Self::Ethereum,
            10 => Self::Optimism,
            56 => Self::BinanceSmartChain,
            100 => Self::Gnosis,
            137 => Self::Polygon,
            146 => Self::Sonic,
            324 => Self::ZkSync,
            8453 => Self::Coinbase,
            42161 => Self::Arbitrum,
            43114 => Self::Avalanche,
            59144 => Self::Linea,
            other => return Err(format!("unsupported chain id {other}")),
        };
        Ok(network)
    }
}

impl From<NetworkId> for u64 {
    fn from(network: NetworkId) -> Self {
        network.chain_id()
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.chain_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_round_trip_through_serde() {
        let json = serde_json::to_string(&NetworkId::Arbitrum).unwrap();
        assert_eq!(json, "42161");

        let parsed: NetworkId = serde_json::from_str("8453").unwrap();
        assert_eq!(parsed, NetworkId::Coinbase);
    }

    #[test]
    fn test_unknown_chain_id_rejected() {
        assert!(NetworkId::try_from(999_999).is_err());
        assert!(serde_json::from_str::<NetworkId>("5").is_err());
    }
}
