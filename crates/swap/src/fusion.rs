use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{OrderParams, Quote, QuoteParams, Result, SwapAggregator, SwapError};

/// Fusion+ cross-chain aggregator API client
///
/// The submitted order is an assumed, unsigned shape: quote id, preset,
/// maker address, hash-lock and secret hashes. The public relayer expects a
/// maker-signed EIP-712 order instead, so against that endpoint this client
/// only works behind a service that builds and signs the order for the maker.
pub struct FusionPlusClient {
    base_url: String,
    auth_key: String,
    client: reqwest::Client,
}

impl FusionPlusClient {
    pub fn new(base_url: impl Into<String>, auth_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_key: auth_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create client for the public API
    pub fn mainnet(auth_key: impl Into<String>) -> Self {
        Self::new("https://api.1inch.dev/fusion-plus", auth_key)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.auth_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.auth_key)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitOrderRequest<'a> {
    quote_id: Option<&'a str>,
    preset: &'a str,
    wallet_address: &'a str,
    hash_lock: String,
    secret_hashes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitOrderResponse {
    order_hash: String,
}

#[async_trait]
impl SwapAggregator for FusionPlusClient {
    async fn get_quote(&self, params: &QuoteParams) -> Result<Quote> {
        let url = format!("{}/quoter/v1.0/quote/receive", self.base_url);
        debug!(url = %url, src = %params.src_chain_id, dst = %params.dst_chain_id, "requesting quote");

        let response = self
            .authorized(self.client.get(&url).query(params))
            .send()
            .await
            .map_err(|e| SwapError::QuoteFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "quote request rejected");
            return Err(SwapError::QuoteFailed(format!("{status}: {error_text}")));
        }

        response
            .json()
            .await
            .map_err(|e| SwapError::QuoteFailed(format!("failed to parse quote: {e}")))
    }

    async fn place_order(&self, quote: &Quote, order: &OrderParams) -> Result<String> {
        let url = format!("{}/relayer/v1.0/submit", self.base_url);
        let request = SubmitOrderRequest {
            quote_id: quote.quote_id.as_deref(),
            preset: &quote.recommended_preset,
            wallet_address: &order.wallet_address,
            hash_lock: order.hash_lock.to_string(),
            secret_hashes: order
                .secret_hashes
                .iter()
                .map(|hash| format!("{hash:#x}"))
                .collect(),
        };
        debug!(url = %url, secrets = request.secret_hashes.len(), "submitting order");

        let response = self
            .authorized(self.client.post(&url).json(&request))
            .send()
            .await
            .map_err(|e| SwapError::OrderFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "order submission rejected");
            return Err(SwapError::OrderFailed(format!("{status}: {error_text}")));
        }

        let submitted: SubmitOrderResponse = response
            .json()
            .await
            .map_err(|e| SwapError::OrderFailed(format!("failed to parse response: {e}")))?;

        Ok(submitted.order_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HashLock, Secret};
    use payout_types::NetworkId;

    #[test]
    fn test_submit_request_shape() {
        let secret = Secret::from_bytes([3; 32]);
        let lock = HashLock::for_single_fill(&secret);
        let request = SubmitOrderRequest {
            quote_id: Some("q-1"),
            preset: "fast",
            wallet_address: "0xmaker",
            hash_lock: lock.to_string(),
            secret_hashes: vec![format!("{:#x}", secret.hash())],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["quoteId"], "q-1");
        assert_eq!(json["hashLock"], json["secretHashes"][0]);
        // unsigned body: no maker signature travels with the order
        assert!(json.get("signature").is_none());
        assert_eq!(json.as_object().unwrap().len(), 5);
    }

    #[tokio::test]
    #[ignore] // requires network access and an API key
    async fn test_live_quote() {
        let key = std::env::var("ONEINCH_API_KEY").unwrap_or_default();
        let client = FusionPlusClient::mainnet(key);
        let params = QuoteParams {
            src_chain_id: NetworkId::Arbitrum,
            dst_chain_id: NetworkId::Coinbase,
            src_token_address: "0xaf88d065e77c8cC2239327C5EDb3A432268e5831".to_string(),
            dst_token_address: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string(),
            amount: "1000000".to_string(),
            wallet_address: "0xe8F413337d1c3B742fBf1A00269EBeeb0148d00a".to_string(),
            enable_estimate: true,
        };

        let quote = client.get_quote(&params).await.unwrap();
        assert!(quote.preset().unwrap().secrets_count >= 1);
    }
}
