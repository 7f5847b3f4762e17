use std::sync::Arc;

use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::types::{Address, Bytes, TxHash};
use payout_types::{connect_signer, ensure_success, format_hash, parse_address, SignerClient};
use tracing::info;

use crate::{ConfidentialError, Result};

abigen!(
    Erc7984,
    r#"[
        {
            "inputs": [
                {"internalType":"address","name":"to","type":"address"},
                {"internalType":"bytes32","name":"encryptedAmount","type":"bytes32"},
                {"internalType":"bytes","name":"inputProof","type":"bytes"}
            ],
            "name":"confidentialTransfer",
            "outputs": [],
            "stateMutability":"nonpayable",
            "type":"function"
        },
        {
            "inputs": [
                {"internalType":"address","name":"account","type":"address"}
            ],
            "name":"confidentialBalanceOf",
            "outputs": [
                {"internalType":"bytes32","name":"","type":"bytes32"}
            ],
            "stateMutability":"view",
            "type":"function"
        }
    ]"#
);

/// An ERC-7984 confidential token
#[async_trait]
pub trait ConfidentialToken: Send + Sync {
    fn address(&self) -> Address;

    /// Submit a transfer of an encrypted amount and wait for one confirmation
    async fn confidential_transfer(&self, to: Address, handle: [u8; 32], proof: Bytes)
        -> Result<TxHash>;

    /// Encrypted balance handle of `account`
    async fn confidential_balance_of(&self, account: Address) -> Result<[u8; 32]>;
}

pub struct Erc7984Token {
    contract: Erc7984<SignerClient>,
}

impl Erc7984Token {
    pub fn new(address: Address, client: Arc<SignerClient>) -> Self {
        Self {
            contract: Erc7984::new(address, client),
        }
    }

    pub async fn connect(rpc_url: &str, private_key: &str, token: &str) -> Result<Self> {
        let address = parse_address(token)?;
        let client = connect_signer(rpc_url, private_key).await?;
        Ok(Self::new(address, client))
    }
}

#[async_trait]
impl ConfidentialToken for Erc7984Token {
    fn address(&self) -> Address {
        self.contract.address()
    }

    async fn confidential_transfer(
        &self,
        to: Address,
        handle: [u8; 32],
        proof: Bytes,
    ) -> Result<TxHash> {
        let call = self.contract.confidential_transfer(to, handle, proof);
        let pending = call
            .send()
            .await
            .map_err(|e| ConfidentialError::Contract(format!("confidentialTransfer failed: {e}")))?;

        let tx_hash = pending.tx_hash();
        info!(tx_hash = %format_hash(tx_hash), "confidential transfer submitted");

        let receipt = pending
            .await
            .map_err(|e| ConfidentialError::Contract(format!("tx confirmation failed: {e}")))?;
        ensure_success(tx_hash, receipt)?;

        Ok(tx_hash)
    }

    async fn confidential_balance_of(&self, account: Address) -> Result<[u8; 32]> {
        self.contract
            .confidential_balance_of(account)
            .call()
            .await
            .map_err(|e| ConfidentialError::Contract(format!("confidentialBalanceOf failed: {e}")))
    }
}
