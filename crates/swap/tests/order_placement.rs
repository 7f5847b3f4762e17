use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::types::{Address, TxHash, H256, U256};
use payout_erc20::{Erc20Error, TokenApprover};
use payout_swap::{
    hash_secret, multi_fill_leaf, place_cross_chain_order, HashLock, OrderParams, Preset, Quote,
    QuoteParams, SwapAggregator, SwapError, SwapRequest,
};
use payout_types::NetworkId;
use tokio::sync::Mutex;

type CallLog = Arc<Mutex<Vec<String>>>;

struct MockAggregator {
    secrets_count: u32,
    should_fail: bool,
    log: CallLog,
    quotes: Arc<Mutex<Vec<QuoteParams>>>,
    orders: Arc<Mutex<Vec<OrderParams>>>,
}

impl MockAggregator {
    fn new(secrets_count: u32, log: CallLog) -> Self {
        Self {
            secrets_count,
            should_fail: false,
            log,
            quotes: Arc::new(Mutex::new(Vec::new())),
            orders: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SwapAggregator for MockAggregator {
    async fn get_quote(&self, params: &QuoteParams) -> Result<Quote, SwapError> {
        self.log.lock().await.push("quote".to_string());
        self.quotes.lock().await.push(params.clone());
        if self.should_fail {
            return Err(SwapError::QuoteFailed("insufficient liquidity".to_string()));
        }

        let mut presets = HashMap::new();
        presets.insert(
            "fast".to_string(),
            Preset {
                secrets_count: self.secrets_count,
                auction_duration: 180,
                allow_partial_fills: self.secrets_count > 1,
                allow_multiple_fills: self.secrets_count > 1,
            },
        );

        Ok(Quote {
            quote_id: Some("q-1".to_string()),
            src_token_amount: params.amount.clone(),
            dst_token_amount: "998000".to_string(),
            presets,
            recommended_preset: "fast".to_string(),
        })
    }

    async fn place_order(&self, _quote: &Quote, order: &OrderParams) -> Result<String, SwapError> {
        self.log.lock().await.push("place".to_string());
        self.orders.lock().await.push(order.clone());
        Ok("0xorder".to_string())
    }
}

struct MockApprover {
    log: CallLog,
    approvals: Arc<Mutex<Vec<(Address, U256)>>>,
}

#[async_trait]
impl TokenApprover for MockApprover {
    async fn approve(&self, spender: Address, amount: U256) -> Result<TxHash, Erc20Error> {
        self.log.lock().await.push("approve".to_string());
        self.approvals.lock().await.push((spender, amount));
        Ok(TxHash::repeat_byte(0x01))
    }
}

fn approver(log: CallLog) -> MockApprover {
    MockApprover {
        log,
        approvals: Arc::new(Mutex::new(Vec::new())),
    }
}

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

#[tokio::test]
async fn test_single_secret_quote_uses_single_fill_lock() {
    let log = CallLog::default();
    let aggregator = MockAggregator::new(1, log.clone());
    let approver = approver(log.clone());

    let order = place_cross_chain_order(&aggregator, &approver, &request())
        .await
        .unwrap();

    assert_eq!(order.order_hash, "0xorder");
    assert_eq!(order.secrets.len(), 1);
    assert!(!order.is_multi_fill());

    let expected = hash_secret(&order.secrets[0]).unwrap();
    assert_eq!(order.hash_lock, format!("{expected:#x}"));

    let placed = aggregator.orders.lock().await;
    assert_eq!(placed[0].hash_lock, HashLock::SingleFill(expected));
    assert_eq!(placed[0].secret_hashes, vec![expected]);
}

#[tokio::test]
async fn test_two_secret_quote_uses_multi_fill_lock() {
    let log = CallLog::default();
    let aggregator = MockAggregator::new(2, log.clone());
    let approver = approver(log.clone());

    let order = place_cross_chain_order(&aggregator, &approver, &request())
        .await
        .unwrap();

    assert_eq!(order.secrets.len(), 2);
    assert!(order.is_multi_fill());

    let hashes: Vec<H256> = order
        .secrets
        .iter()
        .map(|s| hash_secret(s).unwrap())
        .collect();
    let leaves: Vec<H256> = hashes
        .iter()
        .enumerate()
        .map(|(i, h)| multi_fill_leaf(i as u64, *h))
        .collect();
    let expected = HashLock::for_multiple_fills(&leaves).unwrap();

    assert_eq!(order.hash_lock, expected.to_string());
    assert!(order.hash_lock.starts_with("0x0001"));
    assert_eq!(aggregator.orders.lock().await[0].hash_lock, expected);
}

#[tokio::test]
async fn test_zero_secrets_rejected_before_approval() {
    let log = CallLog::default();
    let aggregator = MockAggregator::new(0, log.clone());
    let approver = approver(log.clone());

    let err = place_cross_chain_order(&aggregator, &approver, &request())
        .await
        .unwrap_err();

    assert!(matches!(err, SwapError::InvalidSecretsCount(0)));
    assert_eq!(*log.lock().await, vec!["quote".to_string()]);
}

#[tokio::test]
async fn test_remote_calls_happen_in_order() {
    let log = CallLog::default();
    let aggregator = MockAggregator::new(1, log.clone());
    let approver = approver(log.clone());

    place_cross_chain_order(&aggregator, &approver, &request())
        .await
        .unwrap();

    assert_eq!(*log.lock().await, vec!["quote", "approve", "place"]);
    assert_eq!(
        *approver.approvals.lock().await,
        vec![(Address::repeat_byte(0x11), U256::from(10_000_000u64))]
    );
}

#[tokio::test]
async fn test_inverted_request_quotes_reverse_direction() {
    let log = CallLog::default();
    let aggregator = MockAggregator::new(1, log.clone());
    let approver = approver(log.clone());
    let inverted = SwapRequest {
        invert: true,
        ..request()
    };

    let order = place_cross_chain_order(&aggregator, &approver, &inverted)
        .await
        .unwrap();

    assert_eq!(order.src_chain, NetworkId::Coinbase);
    assert_eq!(order.dst_chain, NetworkId::Arbitrum);

    let quotes = aggregator.quotes.lock().await;
    let quoted = &quotes[0];
    assert_eq!(quoted.src_chain_id, NetworkId::Coinbase);
    assert_eq!(quoted.src_token_address, request().dst_token);
}

#[tokio::test]
async fn test_quote_failure_stops_the_stage() {
    let log = CallLog::default();
    let mut aggregator = MockAggregator::new(1, log.clone());
    aggregator.should_fail = true;
    let approver = approver(log.clone());

    let err = place_cross_chain_order(&aggregator, &approver, &request())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "quote request failed: insufficient liquidity");
    assert!(approver.approvals.lock().await.is_empty());
}
