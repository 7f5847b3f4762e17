//! Stage functions of a worker run
//!
//! Each stage takes its inputs by reference and returns its own output or a
//! [`StageError`]; none of them touches state owned by another stage.

use payout_config::{ConfidentialTransferConfig, CrossChainConfig, Erc20Config};
use payout_confidential::{
    execute_confidential_transfer, ConfidentialError, ConfidentialTransferReceipt,
    ConfidentialTransferRequest,
};
use payout_dataset::read_protected_input;
use payout_erc20::{send_erc20, Erc20Error, Erc20TransferParams, Erc20TransferReceipt};
use payout_swap::{parse_base_units, place_cross_chain_order, SwapError, SwapRequest};
use payout_types::{parse_address, CrossChainOrder, ProtectedInput};
use tracing::{info, info_span, warn, Instrument, Span};

use crate::{Connector, Stage, StageError};

/// Span wrapping every event of one stage
pub fn stage_span(stage: Stage) -> Span {
    match stage {
        Stage::ConfidentialTransfer => info_span!("confidential_transfer"),
        Stage::CrossChain => info_span!("cross_chain"),
        Stage::ProtectedData => info_span!("protected_data"),
        Stage::Erc20 => info_span!("erc20"),
    }
}

fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Clone, Debug)]
pub struct ConfidentialOutput {
    pub receipt: ConfidentialTransferReceipt,
    pub amount: u64,
    pub decimals: u8,
    /// Whether the cleartext amount may be reported
    pub disclosed: bool,
}

pub async fn confidential_transfer_stage(
    connector: &dyn Connector,
    config: &ConfidentialTransferConfig,
    sender_key: Option<&str>,
) -> Result<ConfidentialOutput, StageError> {
    let stage = Stage::ConfidentialTransfer;

    async {
        let sender_key = provided(sender_key).ok_or(ConfidentialError::MissingSenderKey)?;
        let request = ConfidentialTransferRequest {
            user: parse_address(&config.user_address)?,
            recipient: parse_address(&config.recipient)?,
            amount: config.amount,
        };

        if config.disclose_amount {
            info!(amount = config.amount, decimals = config.decimals, "starting confidential transfer");
        } else {
            info!("starting confidential transfer");
        }

        let clients = connector.confidential(config, sender_key).await?;
        let receipt =
            execute_confidential_transfer(clients.relay.as_ref(), clients.token.as_ref(), &request)
                .await?;

        Ok::<_, ConfidentialError>(ConfidentialOutput {
            receipt,
            amount: config.amount,
            decimals: config.decimals,
            disclosed: config.disclose_amount,
        })
    }
    .instrument(stage_span(stage))
    .await
    .map_err(|e| {
        warn!(stage = %stage, error = %e, "stage failed");
        StageError::new(stage, e)
    })
}

/// Swap request described by the cross-chain configuration
pub fn swap_request(config: &CrossChainConfig) -> Result<SwapRequest, SwapError> {
    Ok(SwapRequest {
        src_chain: config.src_chain,
        dst_chain: config.dst_chain,
        src_token: config.src_token.clone(),
        dst_token: config.dst_token.clone(),
        amount: config.amount.clone(),
        maker: config.maker_address.clone(),
        enable_estimate: config.enable_estimate,
        invert: config.invert,
        router: parse_address(&config.router_address)?,
        approve_amount: parse_base_units(&config.approve_amount)?,
    })
}

fn missing_cross_chain_params(config: &CrossChainConfig, sender_key: Option<&str>) -> Vec<&'static str> {
    let blank = |s: &str| s.trim().is_empty();
    let mut missing = Vec::new();

    if provided(sender_key).is_none() {
        missing.push("sender_key");
    }
    if blank(&config.auth_key) {
        missing.push("auth_key");
    }
    if blank(&config.node_url) {
        missing.push("node_url");
    }
    if blank(&config.maker_address) {
        missing.push("maker_address");
    }
    missing
}

pub async fn cross_chain_stage(
    connector: &dyn Connector,
    config: &CrossChainConfig,
    sender_key: Option<&str>,
) -> Result<CrossChainOrder, StageError> {
    let stage = Stage::CrossChain;

    async {
        let missing = missing_cross_chain_params(config, sender_key);
        if !missing.is_empty() {
            return Err(SwapError::MissingParameters(missing.join(", ")));
        }
        let sender_key = provided(sender_key).unwrap_or_default();

        let request = swap_request(config)?;
        let src_token = request.oriented().src_token;
        info!(
            src_chain = %request.src_chain.chain_id(),
            dst_chain = %request.dst_chain.chain_id(),
            invert = request.invert,
            "starting cross-chain swap"
        );

        let clients = connector.cross_chain(config, &src_token, sender_key).await?;
        let order =
            place_cross_chain_order(clients.aggregator.as_ref(), clients.approver.as_ref(), &request)
                .await?;
        Ok::<_, SwapError>(order)
    }
    .instrument(stage_span(stage))
    .await
    .map_err(|e| {
        warn!(stage = %stage, error = %e, "stage failed");
        StageError::new(stage, e)
    })
}

/// Read the protected invoice fields
///
/// On error the caller falls back to [`ProtectedInput::unavailable`].
pub async fn protected_data_stage(connector: &dyn Connector) -> Result<ProtectedInput, StageError> {
    let stage = Stage::ProtectedData;
    let store = connector.protected_data();

    read_protected_input(store.as_ref())
        .instrument(stage_span(stage))
        .await
        .map_err(|e| {
            warn!(stage = %stage, error = %e, "protected data unavailable, falling back to N/A");
            StageError::new(stage, e)
        })
}

/// Result of the plain ERC-20 payout
#[derive(Clone, Debug)]
pub enum Erc20Outcome {
    Sent(Erc20TransferReceipt),
    /// Required parameters were missing; no transfer was attempted
    Skipped { missing_sender_key: bool },
}

/// Payout parameters: the protected amount goes to the protected wallet
pub fn erc20_params(
    config: &Erc20Config,
    protected: &ProtectedInput,
    sender_key: Option<&str>,
) -> Erc20TransferParams {
    Erc20TransferParams {
        rpc_url: config.rpc_url.clone(),
        sender_key: provided(sender_key).map(str::to_string),
        recipient: protected.wallet.clone(),
        token_address: config.token_address.clone(),
        amount: protected.amount.clone(),
        decimals: config.resolve_decimals(),
    }
}

pub async fn erc20_stage(
    connector: &dyn Connector,
    params: &Erc20TransferParams,
) -> Result<Erc20Outcome, StageError> {
    let stage = Stage::Erc20;

    async {
        let missing = params.missing();
        if !missing.is_empty() {
            info!(missing = ?missing, "ERC20 transfer parameters not fully provided, skipping");
            return Ok(Erc20Outcome::Skipped {
                missing_sender_key: !params.has_sender_key(),
            });
        }

        info!(token = %params.token_address, decimals = %params.decimals, "starting ERC20 transfer");
        let token = connector.token_transfer(params).await?;
        let receipt = send_erc20(token.as_ref(), params).await?;
        Ok::<_, Erc20Error>(Erc20Outcome::Sent(receipt))
    }
    .instrument(stage_span(stage))
    .await
    .map_err(|e| {
        warn!(stage = %stage, error = %e, "stage failed");
        StageError::new(stage, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use payout_types::NOT_AVAILABLE;

    #[test]
    fn test_erc20_params_pay_protected_wallet() {
        let protected = ProtectedInput::new("INV-1", "12.5", "arbitrum", "USDC", "0xabc");
        let params = erc20_params(&Erc20Config::default(), &protected, Some("0xkey"));

        assert_eq!(params.recipient, "0xabc");
        assert_eq!(params.amount, "12.5");
        assert_eq!(params.decimals, "6");
        assert!(params.is_complete());
    }

    #[test]
    fn test_erc20_params_without_protected_input() {
        let params = erc20_params(&Erc20Config::default(), &ProtectedInput::unavailable(), None);

        assert_eq!(params.recipient, NOT_AVAILABLE);
        assert_eq!(params.amount, NOT_AVAILABLE);
        assert!(!params.has_sender_key());
    }

    #[test]
    fn test_blank_sender_key_counts_as_missing() {
        let params = erc20_params(&Erc20Config::default(), &ProtectedInput::unavailable(), Some("  "));
        assert!(params.sender_key.is_none());
    }

    #[test]
    fn test_missing_cross_chain_params_are_listed() {
        let config = CrossChainConfig::default();
        assert_eq!(
            missing_cross_chain_params(&config, None),
            vec!["sender_key", "auth_key"]
        );

        let config = CrossChainConfig {
            auth_key: "key".to_string(),
            ..Default::default()
        };
        assert!(missing_cross_chain_params(&config, Some("0xkey")).is_empty());
    }

    #[test]
    fn test_swap_request_from_defaults() {
        let request = swap_request(&CrossChainConfig::default()).unwrap();
        assert_eq!(request.amount, "1000000");
        assert!(!request.invert);
        assert_eq!(request.approve_amount, ethers::types::U256::from(10_000_000u64));
    }

    #[test]
    fn test_swap_request_rejects_bad_router() {
        let config = CrossChainConfig {
            router_address: "router".to_string(),
            ..Default::default()
        };
        assert!(matches!(swap_request(&config), Err(SwapError::Evm(_))));
    }
}
