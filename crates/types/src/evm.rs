use std::str::FromStr;
use std::sync::Arc;

use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TransactionReceipt, TxHash, H256, U64};
use thiserror::Error;

/// Provider with a local signing wallet attached
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

#[derive(Debug, Error)]
pub enum EvmError {
    #[error("invalid address `{0}`")]
    InvalidAddress(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("transaction {0} reverted")]
    Reverted(String),

    #[error("transaction {0} dropped before confirmation")]
    Dropped(String),
}

/// Connect a signing client to a JSON-RPC node
///
/// The chain id is read from the node so signatures match the target network.
pub async fn connect_signer(rpc_url: &str, private_key: &str) -> Result<Arc<SignerClient>, EvmError> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| EvmError::Provider(format!("invalid rpc url `{rpc_url}`: {e}")))?;

    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| EvmError::Provider(format!("chain id query failed: {e}")))?;

    let wallet = parse_wallet(private_key)?.with_chain_id(chain_id.as_u64());

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

pub fn parse_wallet(private_key: &str) -> Result<LocalWallet, EvmError> {
    private_key
        .trim()
        .parse::<LocalWallet>()
        .map_err(|e| EvmError::InvalidPrivateKey(e.to_string()))
}

/// Parse a `0x`-prefixed 20-byte hex address
pub fn parse_address(value: &str) -> Result<Address, EvmError> {
    let trimmed = value.trim();
    if !is_hex_address(trimmed) {
        return Err(EvmError::InvalidAddress(value.to_string()));
    }
    Address::from_str(trimmed).map_err(|_| EvmError::InvalidAddress(value.to_string()))
}

pub fn is_hex_address(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(body) => body.len() == 40 && body.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

pub fn decode_hex(value: &str) -> Result<Vec<u8>, EvmError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(stripped).map_err(|e| EvmError::InvalidHex(format!("`{value}`: {e}")))
}

pub fn format_hash(hash: H256) -> String {
    format!("{hash:#x}")
}

/// Turn an awaited pending transaction into a successful receipt
pub fn ensure_success(
    tx_hash: TxHash,
    receipt: Option<TransactionReceipt>,
) -> Result<TransactionReceipt, EvmError> {
    let receipt = receipt.ok_or_else(|| EvmError::Dropped(format_hash(tx_hash)))?;
    if receipt.status != Some(U64::from(1u64)) {
        return Err(EvmError::Reverted(format_hash(tx_hash)));
    }
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_requires_prefix_and_length() {
        assert!(parse_address("0x6BbFd1F6dC17322a6e8923cf8072a735A081a975").is_ok());
        assert!(parse_address("6BbFd1F6dC17322a6e8923cf8072a735A081a975").is_err());
        assert!(parse_address("0x6BbF").is_err());
        assert!(parse_address("N/A").is_err());
    }

    #[test]
    fn test_parse_wallet_accepts_prefixed_key() {
        let key = format!("0x{}", "11".repeat(32));
        assert!(parse_wallet(&key).is_ok());
        assert!(parse_wallet("not-a-key").is_err());
    }

    #[test]
    fn test_ensure_success_checks_status() {
        let hash = H256::repeat_byte(0x42);

        let ok = TransactionReceipt {
            status: Some(U64::from(1u64)),
            ..Default::default()
        };
        assert!(ensure_success(hash, Some(ok)).is_ok());

        let reverted = TransactionReceipt {
            status: Some(U64::zero()),
            ..Default::default()
        };
        assert!(matches!(
            ensure_success(hash, Some(reverted)),
            Err(EvmError::Reverted(_))
        ));

        assert!(matches!(ensure_success(hash, None), Err(EvmError::Dropped(_))));
    }

    #[test]
    fn test_format_hash_is_prefixed_lowercase() {
        let formatted = format_hash(H256::repeat_byte(0xAB));
        assert_eq!(formatted, format!("0x{}", "ab".repeat(32)));
    }
}
