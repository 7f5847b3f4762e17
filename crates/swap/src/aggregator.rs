use std::collections::HashMap;

use async_trait::async_trait;
use ethers::types::H256;
use payout_types::NetworkId;
use serde::{Deserialize, Serialize};

use crate::{HashLock, Result, SwapError};

/// Cross-chain swap quote request
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteParams {
    #[serde(rename = "srcChain")]
    pub src_chain_id: NetworkId,
    #[serde(rename = "dstChain")]
    pub dst_chain_id: NetworkId,
    pub src_token_address: String,
    pub dst_token_address: String,
    /// Amount in source-token base units
    pub amount: String,
    pub wallet_address: String,
    pub enable_estimate: bool,
}

/// Auction settings of a quote; `secrets_count` fixes the fill mode
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub secrets_count: u32,
    #[serde(default)]
    pub auction_duration: u64,
    #[serde(default)]
    pub allow_partial_fills: bool,
    #[serde(default)]
    pub allow_multiple_fills: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(default)]
    pub quote_id: Option<String>,
    pub src_token_amount: String,
    pub dst_token_amount: String,
    pub presets: HashMap<String, Preset>,
    pub recommended_preset: String,
}

impl Quote {
    /// The recommended preset
    pub fn preset(&self) -> Result<&Preset> {
        self.presets
            .get(&self.recommended_preset)
            .ok_or_else(|| SwapError::MissingPreset(self.recommended_preset.clone()))
    }
}

/// Maker-side commitments attached to a placed order
#[derive(Clone, Debug)]
pub struct OrderParams {
    pub wallet_address: String,
    pub hash_lock: HashLock,
    pub secret_hashes: Vec<H256>,
}

/// Cross-chain swap aggregator
#[async_trait]
pub trait SwapAggregator: Send + Sync {
    async fn get_quote(&self, params: &QuoteParams) -> Result<Quote>;

    /// Place an order for a quote; returns the order hash
    async fn place_order(&self, quote: &Quote, order: &OrderParams) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUOTE: &str = r#"{
        "quoteId": "q-1",
        "srcTokenAmount": "1000000",
        "dstTokenAmount": "998000",
        "recommendedPreset": "fast",
        "presets": {
            "fast": {"secretsCount": 1, "auctionDuration": 180, "allowPartialFills": false, "allowMultipleFills": false},
            "slow": {"secretsCount": 4, "auctionDuration": 600, "allowPartialFills": true, "allowMultipleFills": true}
        }
    }"#;

    #[test]
    fn test_recommended_preset_selected() {
        let quote: Quote = serde_json::from_str(QUOTE).unwrap();
        assert_eq!(quote.preset().unwrap().secrets_count, 1);
        assert_eq!(quote.quote_id.as_deref(), Some("q-1"));
    }

    #[test]
    fn test_missing_preset_is_an_error() {
        let mut quote: Quote = serde_json::from_str(QUOTE).unwrap();
        quote.recommended_preset = "medium".to_string();
        assert!(matches!(quote.preset(), Err(SwapError::MissingPreset(_))));
    }

    #[test]
    fn test_quote_params_wire_names() {
        let params = QuoteParams {
            src_chain_id: NetworkId::Arbitrum,
            dst_chain_id: NetworkId::Coinbase,
            src_token_address: "0xsrc".to_string(),
            dst_token_address: "0xdst".to_string(),
            amount: "1000000".to_string(),
            wallet_address: "0xmaker".to_string(),
            enable_estimate: true,
        };

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["srcChain"], 42161);
        assert_eq!(json["dstChain"], 8453);
        assert_eq!(json["srcTokenAddress"], "0xsrc");
        assert_eq!(json["enableEstimate"], true);
    }
}
