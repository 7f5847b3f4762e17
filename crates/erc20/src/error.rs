use payout_types::EvmError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Erc20Error>;

#[derive(Debug, Error)]
pub enum Erc20Error {
    #[error("Missing ERC20 transfer parameters")]
    MissingParameters,

    #[error("invalid token decimals `{decimals}`: {reason}")]
    InvalidDecimals { decimals: String, reason: String },

    #[error("invalid token amount `{amount}`: {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("{method} failed: {reason}")]
    Contract { method: &'static str, reason: String },

    #[error(transparent)]
    Evm(#[from] EvmError),
}
