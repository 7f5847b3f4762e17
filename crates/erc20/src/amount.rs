use ethers::types::U256;
use ethers::utils::parse_units;

use crate::{Erc20Error, Result};

/// Largest decimal count an EVM `uint256` amount can carry
pub const MAX_DECIMALS: u8 = 77;

/// Parse a token decimal count such as `"6"`
pub fn parse_decimals(decimals: &str) -> Result<u8> {
    let invalid = |reason: String| Erc20Error::InvalidDecimals {
        decimals: decimals.to_string(),
        reason,
    };

    let parsed = decimals
        .trim()
        .parse::<u8>()
        .map_err(|e| invalid(e.to_string()))?;
    if parsed > MAX_DECIMALS {
        return Err(invalid(format!("must be <= {MAX_DECIMALS}")));
    }
    Ok(parsed)
}

/// Convert a decimal amount string to token base units
///
/// `"12.5"` with 6 decimals is `12500000`. Fractions finer than the token's
/// decimals are rejected rather than rounded.
pub fn parse_token_amount(amount: &str, decimals: u8) -> Result<U256> {
    let trimmed = amount.trim();
    let invalid = |reason: &str| Erc20Error::InvalidAmount {
        amount: amount.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty"));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(invalid("not a non-negative decimal number"));
    }
    if fraction.len() > usize::from(decimals) {
        return Err(invalid(&format!("more than {decimals} fractional digits")));
    }

    let value = parse_units(trimmed, u32::from(decimals)).map_err(|e| invalid(&e.to_string()))?;
    Ok(value.into())
}
