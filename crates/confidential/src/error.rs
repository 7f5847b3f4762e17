use payout_types::EvmError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfidentialError>;

#[derive(Debug, Error)]
pub enum ConfidentialError {
    #[error("Missing sender private key")]
    MissingSenderKey,

    /// Failure reported by (or while reaching) the encryption relay
    #[error("{0}")]
    Relay(String),

    #[error("relay response malformed: {0}")]
    InvalidResponse(String),

    #[error("contract call failed: {0}")]
    Contract(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Evm(#[from] EvmError),
}
