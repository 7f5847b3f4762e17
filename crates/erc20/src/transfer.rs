use payout_types::{format_hash, parse_address};
use serde::Serialize;
use tracing::info;

use crate::{parse_decimals, parse_token_amount, Erc20Error, Result, TokenTransfer};

/// Inputs of a plain ERC-20 payout
///
/// Every field must be non-empty for the payout to be attempted.
#[derive(Clone, Default)]
pub struct Erc20TransferParams {
    pub rpc_url: String,
    pub sender_key: Option<String>,
    pub recipient: String,
    pub token_address: String,
    /// Decimal amount, e.g. `"12.5"`
    pub amount: String,
    /// Token decimals as configured, e.g. `"6"`
    pub decimals: String,
}

impl std::fmt::Debug for Erc20TransferParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Erc20TransferParams")
            .field("rpc_url", &self.rpc_url)
            .field("sender_key", &self.sender_key.as_ref().map(|_| "<redacted>"))
            .field("recipient", &self.recipient)
            .field("token_address", &self.token_address)
            .field("amount", &self.amount)
            .field("decimals", &self.decimals)
            .finish()
    }
}

impl Erc20TransferParams {
    /// Names of the required parameters that are empty
    pub fn missing(&self) -> Vec<&'static str> {
        let blank = |s: &str| s.trim().is_empty();
        let mut missing = Vec::new();

        if blank(&self.rpc_url) {
            missing.push("rpc_url");
        }
        if self.sender_key.as_deref().map_or(true, blank) {
            missing.push("sender_key");
        }
        if blank(&self.recipient) {
            missing.push("recipient");
        }
        if blank(&self.token_address) {
            missing.push("token_address");
        }
        if blank(&self.amount) {
            missing.push("amount");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn has_sender_key(&self) -> bool {
        !self.missing().contains(&"sender_key")
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20TransferReceipt {
    pub tx_hash: String,
    pub recipient: String,
    /// Amount in base units
    pub value: String,
}

/// Transfer `params.amount` of the token to `params.recipient`
pub async fn send_erc20(
    token: &dyn TokenTransfer,
    params: &Erc20TransferParams,
) -> Result<Erc20TransferReceipt> {
    if !params.is_complete() {
        return Err(Erc20Error::MissingParameters);
    }

    let to = parse_address(&params.recipient)?;
    let decimals = parse_decimals(&params.decimals)?;
    let value = parse_token_amount(&params.amount, decimals)?;

    let tx_hash = token.transfer(to, value).await?;
    info!(tx_hash = %format_hash(tx_hash), "ERC20 transfer mined");

    Ok(Erc20TransferReceipt {
        tx_hash: format_hash(tx_hash),
        recipient: format!("{to:?}"),
        value: value.to_string(),
    })
}
