use std::collections::HashMap;

use async_trait::async_trait;
use ethers::types::{Address, U256};
use payout_types::EncryptedPayload;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{ConfidentialError, Result};

/// Remote FHE encryption relay
#[async_trait]
pub trait EncryptionRelay: Send + Sync {
    /// Encrypt a 64-bit value for use by `user` against `contract`
    async fn encrypt_u64(&self, contract: Address, user: Address, value: u64)
        -> Result<EncryptedPayload>;

    /// Decrypt a handle the requesting user is authorized to read
    async fn user_decrypt(&self, request: &UserDecryptRequest) -> Result<U256>;
}

/// A signed user-decryption request
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDecryptRequest {
    pub handle: String,
    pub contract_address: String,
    pub user_address: String,
    pub public_key: String,
    /// EIP-712 signature, hex without `0x`
    pub signature: String,
    pub contract_addresses: Vec<String>,
    pub start_timestamp: String,
    pub duration_days: String,
}

/// HTTP client for an encryption relay gateway
pub struct HttpRelayClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "relay request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ConfidentialError::Relay(format!("relay request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "relay request rejected");
            return Err(ConfidentialError::Relay(format!(
                "relay returned {status}: {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ConfidentialError::InvalidResponse(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EncryptRequest {
    contract_address: String,
    user_address: String,
    values: Vec<TypedValue>,
}

#[derive(Debug, Serialize)]
struct TypedValue {
    #[serde(rename = "type")]
    kind: &'static str,
    value: String,
}

#[derive(Debug, Deserialize)]
struct UserDecryptResponse {
    results: HashMap<String, String>,
}

#[async_trait]
impl EncryptionRelay for HttpRelayClient {
    async fn encrypt_u64(
        &self,
        contract: Address,
        user: Address,
        value: u64,
    ) -> Result<EncryptedPayload> {
        let request = EncryptRequest {
            contract_address: format!("{contract:?}"),
            user_address: format!("{user:?}"),
            values: vec![TypedValue {
                kind: "euint64",
                value: value.to_string(),
            }],
        };

        let payload: EncryptedPayload = self.post("/v1/encrypt", &request).await?;
        if payload.handles.is_empty() {
            return Err(ConfidentialError::InvalidResponse(
                "relay returned no handles".to_string(),
            ));
        }
        Ok(payload)
    }

    async fn user_decrypt(&self, request: &UserDecryptRequest) -> Result<U256> {
        let response: UserDecryptResponse = self.post("/v1/user-decrypt", request).await?;
        decrypted_value(&response.results, &request.handle)
    }
}

fn decrypted_value(results: &HashMap<String, String>, handle: &str) -> Result<U256> {
    let value = results
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(handle))
        .map(|(_, value)| value)
        .ok_or_else(|| {
            ConfidentialError::InvalidResponse(format!("no cleartext for handle {handle}"))
        })?;

    U256::from_dec_str(value)
        .map_err(|e| ConfidentialError::InvalidResponse(format!("cleartext `{value}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_request_shape() {
        let request = EncryptRequest {
            contract_address: format!("{:?}", Address::repeat_byte(0x11)),
            user_address: format!("{:?}", Address::repeat_byte(0x22)),
            values: vec![TypedValue {
                kind: "euint64",
                value: "1000000".to_string(),
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["values"][0]["type"], "euint64");
        assert_eq!(json["values"][0]["value"], "1000000");
        assert_eq!(
            json["contractAddress"],
            format!("0x{}", "11".repeat(20))
        );
    }

    #[test]
    fn test_decrypted_value_matches_handle_case_insensitively() {
        let mut results = HashMap::new();
        results.insert("0xABCD".to_string(), "2500000".to_string());

        assert_eq!(
            decrypted_value(&results, "0xabcd").unwrap(),
            U256::from(2_500_000u64)
        );
        assert!(decrypted_value(&results, "0xffff").is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpRelayClient::new("https://relay.example/");
        assert_eq!(client.base_url, "https://relay.example");
    }

    #[tokio::test]
    #[ignore] // requires a reachable relay gateway
    async fn test_live_encrypt() {
        let client = HttpRelayClient::new("https://relayer.testnet.zama.cloud");
        let payload = client
            .encrypt_u64(Address::repeat_byte(0x11), Address::repeat_byte(0x22), 1)
            .await
            .unwrap();
        assert!(!payload.handles.is_empty());
    }
}
