use ethers::types::{Address, H256, U256};
use payout_erc20::TokenApprover;
use payout_types::{format_hash, CrossChainOrder, NetworkId};
use tracing::{debug, info};

use crate::{
    generate_secrets, HashLock, OrderParams, QuoteParams, Result, SwapAggregator, SwapError,
};

/// A cross-chain swap to place, as configured
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapRequest {
    pub src_chain: NetworkId,
    pub dst_chain: NetworkId,
    pub src_token: String,
    pub dst_token: String,
    /// Amount in source-token base units
    pub amount: String,
    pub maker: String,
    pub enable_estimate: bool,
    /// Swap source and destination before quoting
    pub invert: bool,
    /// Router allowed to pull the source token
    pub router: Address,
    pub approve_amount: U256,
}

impl SwapRequest {
    /// The request with source and destination swapped when `invert` is set
    pub fn oriented(&self) -> Self {
        if !self.invert {
            return self.clone();
        }
        Self {
            src_chain: self.dst_chain,
            dst_chain: self.src_chain,
            src_token: self.dst_token.clone(),
            dst_token: self.src_token.clone(),
            invert: false,
            ..self.clone()
        }
    }

    fn quote_params(&self) -> QuoteParams {
        QuoteParams {
            src_chain_id: self.src_chain,
            dst_chain_id: self.dst_chain,
            src_token_address: self.src_token.clone(),
            dst_token_address: self.dst_token.clone(),
            amount: self.amount.clone(),
            wallet_address: self.maker.clone(),
            enable_estimate: self.enable_estimate,
        }
    }
}

/// Parse a base-unit integer amount
pub fn parse_base_units(amount: &str) -> Result<U256> {
    let trimmed = amount.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(SwapError::InvalidAmount(amount.to_string()));
    }
    U256::from_dec_str(trimmed).map_err(|_| SwapError::InvalidAmount(amount.to_string()))
}

/// Quote, lock, approve and place a cross-chain order
///
/// `approver` must act on the source token of [`SwapRequest::oriented`].
pub async fn place_cross_chain_order(
    aggregator: &dyn SwapAggregator,
    approver: &dyn TokenApprover,
    request: &SwapRequest,
) -> Result<CrossChainOrder> {
    let request = request.oriented();
    parse_base_units(&request.amount)?;

    let quote = aggregator.get_quote(&request.quote_params()).await?;
    let secrets_count = quote.preset()?.secrets_count;
    info!(secrets_count, preset = %quote.recommended_preset, "received cross-chain quote");

    let secrets = generate_secrets(secrets_count)?;
    let secret_hashes: Vec<H256> = secrets.iter().map(|s| s.hash()).collect();
    let hash_lock = HashLock::for_secrets(&secrets)?;
    debug!(multi_fill = hash_lock.is_multi_fill(), hash_lock = %hash_lock, "hash-lock derived");

    let approval = approver
        .approve(request.router, request.approve_amount)
        .await?;
    debug!(tx_hash = %format_hash(approval), "router approved");

    let order = OrderParams {
        wallet_address: request.maker.clone(),
        hash_lock,
        secret_hashes: secret_hashes.clone(),
    };
    let order_hash = aggregator.place_order(&quote, &order).await?;
    info!(order_hash = %order_hash, "cross-chain order placed");

    Ok(CrossChainOrder {
        order_hash,
        secrets: secrets.iter().map(|s| s.to_hex()).collect(),
        secret_hashes: secret_hashes.iter().map(|h| format!("{h:#x}")).collect(),
        hash_lock: hash_lock.to_string(),
        src_chain: request.src_chain,
        dst_chain: request.dst_chain,
        src_token: request.src_token,
        dst_token: request.dst_token,
        amount: request.amount,
        maker: request.maker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SwapRequest {
        SwapRequest {
            src_chain: NetworkId::Arbitrum,
            dst_chain: NetworkId::Coinbase,
            src_token: "0xaf88d065e77c8cC2239327C5EDb3A432268e5831".to_string(),
            dst_token: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string(),
            amount: "1000000".to_string(),
            maker: "0xe8F413337d1c3B742fBf1A00269EBeeb0148d00a".to_string(),
            enable_estimate: true,
            invert: false,
            router: Address::repeat_byte(0x11),
            approve_amount: U256::from(10_000_000u64),
        }
    }

    #[test]
    fn test_oriented_without_invert_is_identity() {
        assert_eq!(request().oriented(), request());
    }

    #[test]
    fn test_invert_swaps_chains_and_tokens() {
        let inverted = SwapRequest {
            invert: true,
            ..request()
        }
        .oriented();

        assert_eq!(inverted.src_chain, NetworkId::Coinbase);
        assert_eq!(inverted.dst_chain, NetworkId::Arbitrum);
        assert_eq!(inverted.src_token, request().dst_token);
        assert_eq!(inverted.dst_token, request().src_token);
        assert_eq!(inverted.amount, request().amount);
    }

    #[test]
    fn test_parse_base_units() {
        assert_eq!(parse_base_units("1000000").unwrap(), U256::from(1_000_000u64));
        assert!(parse_base_units("1.5").is_err());
        assert!(parse_base_units("").is_err());
    }
}
