use std::sync::Arc;

use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::types::{Address, TxHash, U256};
use payout_types::{connect_signer, ensure_success, format_hash, parse_address, SignerClient};
use tracing::info;

use crate::{Erc20Error, Result};

abigen!(
    Erc20,
    r#"[
        function transfer(address to, uint256 amount) external returns (bool)
        function approve(address spender, uint256 amount) external returns (bool)
    ]"#
);

/// Sends tokens; returns once the transfer is confirmed
#[async_trait]
pub trait TokenTransfer: Send + Sync {
    async fn transfer(&self, to: Address, amount: U256) -> Result<TxHash>;
}

/// Grants a spender an allowance; returns once the approval is confirmed
#[async_trait]
pub trait TokenApprover: Send + Sync {
    async fn approve(&self, spender: Address, amount: U256) -> Result<TxHash>;
}

pub struct Erc20Token {
    contract: Erc20<SignerClient>,
}

impl Erc20Token {
    pub fn new(address: Address, client: Arc<SignerClient>) -> Self {
        Self {
            contract: Erc20::new(address, client),
        }
    }

    pub async fn connect(rpc_url: &str, private_key: &str, token: &str) -> Result<Self> {
        let address = parse_address(token)?;
        let client = connect_signer(rpc_url, private_key).await?;
        Ok(Self::new(address, client))
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }
}

#[async_trait]
impl TokenTransfer for Erc20Token {
    async fn transfer(&self, to: Address, amount: U256) -> Result<TxHash> {
        let call = self.contract.transfer(to, amount);
        let pending = call.send().await.map_err(|e| Erc20Error::Contract {
            method: "transfer",
            reason: e.to_string(),
        })?;

        let tx_hash = pending.tx_hash();
        info!(tx_hash = %format_hash(tx_hash), "ERC20 transfer submitted");

        let receipt = pending.await.map_err(|e| Erc20Error::Contract {
            method: "transfer",
            reason: format!("tx confirmation failed: {e}"),
        })?;
        ensure_success(tx_hash, receipt)?;

        Ok(tx_hash)
    }
}

#[async_trait]
impl TokenApprover for Erc20Token {
    async fn approve(&self, spender: Address, amount: U256) -> Result<TxHash> {
        let call = self.contract.approve(spender, amount);
        let pending = call.send().await.map_err(|e| Erc20Error::Contract {
            method: "approve",
            reason: e.to_string(),
        })?;

        let tx_hash = pending.tx_hash();
        info!(tx_hash = %format_hash(tx_hash), spender = ?spender, "approval submitted");

        let receipt = pending.await.map_err(|e| Erc20Error::Contract {
            method: "approve",
            reason: format!("tx confirmation failed: {e}"),
        })?;
        ensure_success(tx_hash, receipt)?;

        Ok(tx_hash)
    }
}
