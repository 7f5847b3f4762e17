use serde::{Deserialize, Serialize};

use crate::NOT_AVAILABLE;

/// Dataset keys read from the protected input, in read order
pub const PROTECTED_FIELDS: [&str; 5] = ["invoiceId", "amount", "chain", "token", "wallet"];

/// Invoice fields decrypted from the protected dataset
///
/// Read once per run. When retrieval fails every field holds [`NOT_AVAILABLE`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedInput {
    pub invoice_id: String,
    pub amount: String,
    pub chain: String,
    pub token: String,
    pub wallet: String,
}

impl ProtectedInput {
    pub fn new(
        invoice_id: impl Into<String>,
        amount: impl Into<String>,
        chain: impl Into<String>,
        token: impl Into<String>,
        wallet: impl Into<String>,
    ) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            amount: amount.into(),
            chain: chain.into(),
            token: token.into(),
            wallet: wallet.into(),
        }
    }

    /// All five fields set to the `N/A` sentinel
    pub fn unavailable() -> Self {
        Self::new(
            NOT_AVAILABLE,
            NOT_AVAILABLE,
            NOT_AVAILABLE,
            NOT_AVAILABLE,
            NOT_AVAILABLE,
        )
    }

    /// Build from values listed in [`PROTECTED_FIELDS`] order
    pub fn from_values(values: [String; 5]) -> Self {
        let [invoice_id, amount, chain, token, wallet] = values;
        Self {
            invoice_id,
            amount,
            chain,
            token,
            wallet,
        }
    }

    /// Field values in [`PROTECTED_FIELDS`] order
    pub fn values(&self) -> Vec<String> {
        vec![
            self.invoice_id.clone(),
            self.amount.clone(),
            self.chain.clone(),
            self.token.clone(),
            self.wallet.clone(),
        ]
    }

    pub fn is_available(&self) -> bool {
        *self != Self::unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_uses_sentinel() {
        let input = ProtectedInput::unavailable();
        assert!(input.values().iter().all(|v| v == NOT_AVAILABLE));
        assert!(!input.is_available());
    }

    #[test]
    fn test_values_follow_field_order() {
        let input = ProtectedInput::from_values([
            "INV-1".to_string(),
            "12.5".to_string(),
            "arbitrum".to_string(),
            "USDC".to_string(),
            "0xabc".to_string(),
        ]);

        assert_eq!(input.invoice_id, "INV-1");
        assert_eq!(input.wallet, "0xabc");
        assert_eq!(input.values()[1], "12.5");
        assert!(input.is_available());
    }
}
