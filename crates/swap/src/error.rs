use payout_erc20::Erc20Error;
use payout_types::EvmError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SwapError>;

#[derive(Debug, Error)]
pub enum SwapError {
    #[error("Missing required parameters for cross-chain transfer: {0}")]
    MissingParameters(String),

    #[error("quote requires {0} secrets, at least 1 expected")]
    InvalidSecretsCount(u32),

    #[error("multiple-fill hash-lock needs at least 2 leaves, got {0}")]
    TooFewLeaves(usize),

    #[error("preset `{0}` missing from quote")]
    MissingPreset(String),

    #[error("quote request failed: {0}")]
    QuoteFailed(String),

    #[error("order submission failed: {0}")]
    OrderFailed(String),

    #[error("invalid amount `{0}`")]
    InvalidAmount(String),

    #[error("secret generation failed: {0}")]
    Entropy(String),

    #[error("source token client unavailable: {0}")]
    Connection(#[source] Erc20Error),

    #[error("router approval failed: {0}")]
    Approval(#[from] Erc20Error),

    #[error(transparent)]
    Evm(#[from] EvmError),
}
