//! Confidential balance lookup.
//!
//! The holder signs an EIP-712 `UserDecryptRequestVerification` authorizing a
//! session key to read handles of the listed contracts for a number of days;
//! the relay checks the signature and returns the cleartext.

use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip712::TypedData;
use ethers::types::{Address, U256};
use ethers::utils::format_units;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{ConfidentialError, ConfidentialToken, EncryptionRelay, Result, UserDecryptRequest};

/// EIP-712 domain name of user-decryption authorizations
pub const DECRYPTION_DOMAIN_NAME: &str = "Decryption";

/// EIP-712 domain version of user-decryption authorizations
pub const DECRYPTION_DOMAIN_VERSION: &str = "1";

/// Authorization granting a session key read access to confidential handles
#[derive(Clone, Debug)]
pub struct DecryptAuthorization {
    /// `0x`-prefixed session public key
    pub public_key: String,
    pub contract_addresses: Vec<Address>,
    /// Chain hosting the confidential contracts
    pub contracts_chain_id: u64,
    /// Unix seconds
    pub start_timestamp: u64,
    pub duration_days: u32,
    /// Decryption verifier contract, the domain's verifying contract
    pub verifying_contract: Address,
    /// Chain of the decryption gateway, the domain's chain id
    pub gateway_chain_id: u64,
}

impl DecryptAuthorization {
    pub fn typed_data(&self) -> Result<TypedData> {
        let contract_addresses: Vec<String> = self
            .contract_addresses
            .iter()
            .map(|address| format!("{address:?}"))
            .collect();

        let value = json!({
            "types": {
                "EIP712Domain": [
                    {"name": "name", "type": "string"},
                    {"name": "version", "type": "string"},
                    {"name": "chainId", "type": "uint256"},
                    {"name": "verifyingContract", "type": "address"}
                ],
                "UserDecryptRequestVerification": [
                    {"name": "publicKey", "type": "bytes"},
                    {"name": "contractAddresses", "type": "address[]"},
                    {"name": "contractsChainId", "type": "uint256"},
                    {"name": "startTimestamp", "type": "uint256"},
                    {"name": "durationDays", "type": "uint256"}
                ]
            },
            "primaryType": "UserDecryptRequestVerification",
            "domain": {
                "name": DECRYPTION_DOMAIN_NAME,
                "version": DECRYPTION_DOMAIN_VERSION,
                "chainId": self.gateway_chain_id,
                "verifyingContract": format!("{:?}", self.verifying_contract)
            },
            "message": {
                "publicKey": self.public_key,
                "contractAddresses": contract_addresses,
                "contractsChainId": self.contracts_chain_id.to_string(),
                "startTimestamp": self.start_timestamp.to_string(),
                "durationDays": self.duration_days.to_string()
            }
        });

        serde_json::from_value(value).map_err(|e| ConfidentialError::Signing(e.to_string()))
    }
}

/// What to read and how to authorize it
#[derive(Clone, Debug)]
pub struct BalanceQuery {
    pub account: Address,
    pub decimals: u8,
    pub verifying_contract: Address,
    pub gateway_chain_id: u64,
    pub duration_days: u32,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidentialBalance {
    pub account: String,
    pub contract: String,
    /// Encrypted balance handle
    pub handle: String,
    /// Cleartext balance in base units
    pub raw: String,
    pub formatted: String,
}

/// Random 32-byte session key, `0x`-prefixed hex
pub fn generate_session_key() -> Result<String> {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| ConfidentialError::Signing(format!("session key generation failed: {e}")))?;
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// Read and decrypt the confidential balance of `query.account`
///
/// `wallet` signs the authorization; its chain id must be the token's chain.
pub async fn read_confidential_balance(
    token: &dyn ConfidentialToken,
    relay: &dyn EncryptionRelay,
    wallet: &LocalWallet,
    query: &BalanceQuery,
) -> Result<ConfidentialBalance> {
    let contract = token.address();
    let handle = format!("0x{}", hex::encode(token.confidential_balance_of(query.account).await?));
    debug!(handle = %handle, "encrypted balance retrieved");

    let authorization = DecryptAuthorization {
        public_key: generate_session_key()?,
        contract_addresses: vec![contract],
        contracts_chain_id: wallet.chain_id(),
        start_timestamp: chrono::Utc::now().timestamp().max(0) as u64,
        duration_days: query.duration_days,
        verifying_contract: query.verifying_contract,
        gateway_chain_id: query.gateway_chain_id,
    };

    let signature = wallet
        .sign_typed_data(&authorization.typed_data()?)
        .await
        .map_err(|e| ConfidentialError::Signing(e.to_string()))?;
    info!(signer = ?wallet.address(), "decryption request signed");

    let request = UserDecryptRequest {
        handle: handle.clone(),
        contract_address: format!("{contract:?}"),
        user_address: format!("{:?}", wallet.address()),
        public_key: authorization.public_key.clone(),
        signature: hex::encode(signature.to_vec()),
        contract_addresses: vec![format!("{contract:?}")],
        start_timestamp: authorization.start_timestamp.to_string(),
        duration_days: authorization.duration_days.to_string(),
    };

    let raw = relay.user_decrypt(&request).await?;

    Ok(ConfidentialBalance {
        account: format!("{:?}", query.account),
        contract: format!("{contract:?}"),
        handle,
        raw: raw.to_string(),
        formatted: format_balance(raw, query.decimals)?,
    })
}

pub fn format_balance(raw: U256, decimals: u8) -> Result<String> {
    format_units(raw, u32::from(decimals))
        .map_err(|e| ConfidentialError::InvalidResponse(format!("cannot format {raw}: {e}")))
}
