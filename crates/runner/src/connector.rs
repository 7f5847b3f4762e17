use std::path::PathBuf;

use async_trait::async_trait;
use payout_config::{validate_url, ConfidentialTransferConfig, CrossChainConfig};
use payout_confidential::{
    ConfidentialError, ConfidentialToken, EncryptionRelay, Erc7984Token, HttpRelayClient,
};
use payout_dataset::{DatasetDeserializer, ProtectedDataStore};
use payout_erc20::{Erc20Error, Erc20Token, Erc20TransferParams, TokenApprover, TokenTransfer};
use payout_swap::{FusionPlusClient, SwapAggregator, SwapError};
use tracing::debug;

pub struct ConfidentialClients {
    pub relay: Box<dyn EncryptionRelay>,
    pub token: Box<dyn ConfidentialToken>,
}

pub struct SwapClients {
    pub aggregator: Box<dyn SwapAggregator>,
    /// Approver bound to the swap's source token
    pub approver: Box<dyn TokenApprover>,
}

/// Builds the remote collaborators of each stage
///
/// A construction failure fails only the stage asking for the client.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn confidential(
        &self,
        config: &ConfidentialTransferConfig,
        sender_key: &str,
    ) -> Result<ConfidentialClients, ConfidentialError>;

    async fn cross_chain(
        &self,
        config: &CrossChainConfig,
        src_token: &str,
        sender_key: &str,
    ) -> Result<SwapClients, SwapError>;

    fn protected_data(&self) -> Box<dyn ProtectedDataStore>;

    async fn token_transfer(
        &self,
        params: &Erc20TransferParams,
    ) -> Result<Box<dyn TokenTransfer>, Erc20Error>;
}

/// Connector wiring the HTTP and JSON-RPC clients
pub struct LiveConnector {
    dataset_path: Option<PathBuf>,
}

impl LiveConnector {
    pub fn new(dataset_path: Option<PathBuf>) -> Self {
        Self { dataset_path }
    }
}

#[async_trait]
impl Connector for LiveConnector {
    async fn confidential(
        &self,
        config: &ConfidentialTransferConfig,
        sender_key: &str,
    ) -> Result<ConfidentialClients, ConfidentialError> {
        validate_url(&config.relayer_url).map_err(ConfidentialError::Relay)?;

        let token = Erc7984Token::connect(&config.rpc_url, sender_key, &config.token_contract).await?;
        debug!(relayer = %config.relayer_url, "confidential clients ready");

        Ok(ConfidentialClients {
            relay: Box::new(HttpRelayClient::new(config.relayer_url.clone())),
            token: Box::new(token),
        })
    }

    async fn cross_chain(
        &self,
        config: &CrossChainConfig,
        src_token: &str,
        sender_key: &str,
    ) -> Result<SwapClients, SwapError> {
        validate_url(&config.api_url).map_err(SwapError::QuoteFailed)?;

        let approver = Erc20Token::connect(&config.node_url, sender_key, src_token)
            .await
            .map_err(SwapError::Connection)?;
        debug!(api = %config.api_url, "cross-chain clients ready");

        Ok(SwapClients {
            aggregator: Box::new(FusionPlusClient::new(
                config.api_url.clone(),
                config.auth_key.clone(),
            )),
            approver: Box::new(approver),
        })
    }

    fn protected_data(&self) -> Box<dyn ProtectedDataStore> {
        Box::new(DatasetDeserializer::from_path(self.dataset_path.clone()))
    }

    async fn token_transfer(
        &self,
        params: &Erc20TransferParams,
    ) -> Result<Box<dyn TokenTransfer>, Erc20Error> {
        let sender_key = params
            .sender_key
            .as_deref()
            .ok_or(Erc20Error::MissingParameters)?;
        let token = Erc20Token::connect(&params.rpc_url, sender_key, &params.token_address).await?;
        Ok(Box::new(token))
    }
}
