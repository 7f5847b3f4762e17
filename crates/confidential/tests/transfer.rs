use std::sync::Arc;

use async_trait::async_trait;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, TxHash, U256};
use payout_confidential::{
    execute_confidential_transfer, read_confidential_balance, BalanceQuery, ConfidentialError,
    ConfidentialToken, ConfidentialTransferRequest, EncryptionRelay, UserDecryptRequest,
};
use payout_types::EncryptedPayload;
use tokio::sync::Mutex;

#[derive(Default)]
struct MockRelay {
    should_fail: bool,
    encrypted: Arc<Mutex<Vec<(Address, Address, u64)>>>,
    decrypt_requests: Arc<Mutex<Vec<UserDecryptRequest>>>,
}

#[async_trait]
impl EncryptionRelay for MockRelay {
    async fn encrypt_u64(
        &self,
        contract: Address,
        user: Address,
        value: u64,
    ) -> Result<EncryptedPayload, ConfidentialError> {
        if self.should_fail {
            return Err(ConfidentialError::Relay("relay timeout".to_string()));
        }
        self.encrypted.lock().await.push((contract, user, value));
        Ok(EncryptedPayload {
            handles: vec![format!("0x{}", "cd".repeat(32))],
            input_proof: "0x0badf00d".to_string(),
        })
    }

    async fn user_decrypt(&self, request: &UserDecryptRequest) -> Result<U256, ConfidentialError> {
        self.decrypt_requests.lock().await.push(request.clone());
        Ok(U256::from(2_500_000u64))
    }
}

struct MockToken {
    address: Address,
    should_revert: bool,
    transfers: Arc<Mutex<Vec<(Address, [u8; 32], Bytes)>>>,
}

impl MockToken {
    fn new() -> Self {
        Self {
            address: Address::repeat_byte(0x5a),
            should_revert: false,
            transfers: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ConfidentialToken for MockToken {
    fn address(&self) -> Address {
        self.address
    }

    async fn confidential_transfer(
        &self,
        to: Address,
        handle: [u8; 32],
        proof: Bytes,
    ) -> Result<TxHash, ConfidentialError> {
        if self.should_revert {
            return Err(ConfidentialError::Contract("execution reverted".to_string()));
        }
        self.transfers.lock().await.push((to, handle, proof));
        Ok(TxHash::repeat_byte(0x77))
    }

    async fn confidential_balance_of(&self, _account: Address) -> Result<[u8; 32], ConfidentialError> {
        Ok([0xee; 32])
    }
}

fn request() -> ConfidentialTransferRequest {
    ConfidentialTransferRequest {
        user: Address::repeat_byte(0x21),
        recipient: Address::repeat_byte(0x6b),
        amount: 1_000_000,
    }
}

#[tokio::test]
async fn test_transfer_encrypts_then_submits() {
    let relay = MockRelay::default();
    let token = MockToken::new();

    let receipt = execute_confidential_transfer(&relay, &token, &request())
        .await
        .unwrap();

    assert_eq!(receipt.tx_hash, format!("0x{}", "77".repeat(32)));
    assert_eq!(receipt.contract, format!("0x{}", "5a".repeat(20)));

    let encrypted = relay.encrypted.lock().await;
    assert_eq!(*encrypted, vec![(token.address, Address::repeat_byte(0x21), 1_000_000)]);

    let transfers = token.transfers.lock().await;
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].0, Address::repeat_byte(0x6b));
    assert_eq!(transfers[0].1, [0xcd; 32]);
    assert_eq!(transfers[0].2.to_vec(), vec![0x0b, 0xad, 0xf0, 0x0d]);
}

#[tokio::test]
async fn test_relay_failure_message_passes_through() {
    let relay = MockRelay {
        should_fail: true,
        ..Default::default()
    };
    let token = MockToken::new();

    let err = execute_confidential_transfer(&relay, &token, &request())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "relay timeout");
    assert!(token.transfers.lock().await.is_empty());
}

#[tokio::test]
async fn test_reverted_transfer_is_an_error() {
    let relay = MockRelay::default();
    let token = MockToken {
        should_revert: true,
        ..MockToken::new()
    };

    let err = execute_confidential_transfer(&relay, &token, &request())
        .await
        .unwrap_err();
    assert!(matches!(err, ConfidentialError::Contract(_)));
}

#[tokio::test]
async fn test_balance_is_decrypted_and_formatted() {
    let relay = MockRelay::default();
    let token = MockToken::new();
    let wallet: LocalWallet = format!("0x{}", "22".repeat(32)).parse::<LocalWallet>().unwrap().with_chain_id(11155111u64);

    let query = BalanceQuery {
        account: Address::repeat_byte(0x21),
        decimals: 6,
        verifying_contract: Address::repeat_byte(0xb6),
        gateway_chain_id: 55815,
        duration_days: 10,
    };

    let balance = read_confidential_balance(&token, &relay, &wallet, &query)
        .await
        .unwrap();

    assert_eq!(balance.raw, "2500000");
    assert_eq!(balance.formatted, "2.500000");
    assert_eq!(balance.handle, format!("0x{}", "ee".repeat(32)));

    let requests = relay.decrypt_requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].duration_days, "10");
    assert!(!requests[0].signature.starts_with("0x"));
    assert_eq!(requests[0].signature.len(), 130);
}
