use ethers::types::Address;
use payout_types::format_hash;
use serde::Serialize;
use tracing::{debug, info};

use crate::{ConfidentialToken, EncryptionRelay, Result};

/// Parties of a confidential transfer; the token is the encryption contract
#[derive(Clone, Debug)]
pub struct ConfidentialTransferRequest {
    /// Address allowed to import the ciphertexts
    pub user: Address,
    pub recipient: Address,
    /// Amount in token base units
    pub amount: u64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidentialTransferReceipt {
    pub tx_hash: String,
    pub contract: String,
    pub user: String,
    pub recipient: String,
    pub handles: Vec<String>,
    pub input_proof: String,
}

/// Encrypt the amount through the relay and submit it to the token
///
/// The payload is used for exactly this call and never kept.
pub async fn execute_confidential_transfer(
    relay: &dyn EncryptionRelay,
    token: &dyn ConfidentialToken,
    request: &ConfidentialTransferRequest,
) -> Result<ConfidentialTransferReceipt> {
    let contract = token.address();

    debug!(contract = ?contract, user = ?request.user, "encrypting transfer amount");
    let payload = relay
        .encrypt_u64(contract, request.user, request.amount)
        .await?;

    let handle = payload.first_handle()?;
    let proof = payload.proof_bytes()?;

    let tx_hash = token
        .confidential_transfer(request.recipient, handle, proof)
        .await?;
    info!(tx_hash = %format_hash(tx_hash), "confidential transfer confirmed");

    Ok(ConfidentialTransferReceipt {
        tx_hash: format_hash(tx_hash),
        contract: format!("{contract:?}"),
        user: format!("{:?}", request.user),
        recipient: format!("{:?}", request.recipient),
        handles: payload.handles,
        input_proof: payload.input_proof,
    })
}
