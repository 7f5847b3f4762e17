//! Configuration validation

use crate::{ConfigError, Result, RunnerConfig};
use payout_types::is_hex_address;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the runner configuration before any stage runs
///
/// Sections of disabled stages are not checked. The ERC-20 section is left
/// to the payout stage, which records its own `erc20-error`.
pub fn validate_config(config: &RunnerConfig) -> Result<()> {
    let mut errors = Vec::new();

    // Output
    if config.output.result_file.trim().is_empty() {
        errors.push(ValidationError::new("output.result_file", "file name is required"));
    }
    if config.output.computed_file.trim().is_empty() {
        errors.push(ValidationError::new("output.computed_file", "file name is required"));
    }
    if config.output.result_file == config.output.computed_file {
        errors.push(ValidationError::new(
            "output.computed_file",
            "must differ from output.result_file",
        ));
    }

    if let Err(e) = validate_log_level(&config.logging.level) {
        errors.push(e);
    }

    // Confidential transfer
    let confidential = &config.confidential_transfer;
    if confidential.enabled {
        check_url(&mut errors, "confidential_transfer.rpc_url", &confidential.rpc_url);
        check_url(&mut errors, "confidential_transfer.relayer_url", &confidential.relayer_url);
        check_address(&mut errors, "confidential_transfer.token_contract", &confidential.token_contract);
        check_address(&mut errors, "confidential_transfer.user_address", &confidential.user_address);
        check_address(&mut errors, "confidential_transfer.recipient", &confidential.recipient);
        check_address(
            &mut errors,
            "confidential_transfer.decryption_contract",
            &confidential.decryption_contract,
        );

        if confidential.amount == 0 {
            errors.push(ValidationError::new(
                "confidential_transfer.amount",
                "must be greater than 0",
            ));
        }
        if confidential.decrypt_duration_days == 0 {
            errors.push(ValidationError::new(
                "confidential_transfer.decrypt_duration_days",
                "must be greater than 0",
            ));
        }
    }

    // Cross-chain swap
    let cross_chain = &config.cross_chain;
    if cross_chain.enabled {
        check_url(&mut errors, "cross_chain.api_url", &cross_chain.api_url);
        check_url(&mut errors, "cross_chain.node_url", &cross_chain.node_url);
        check_address(&mut errors, "cross_chain.maker_address", &cross_chain.maker_address);
        check_address(&mut errors, "cross_chain.src_token", &cross_chain.src_token);
        check_address(&mut errors, "cross_chain.dst_token", &cross_chain.dst_token);
        check_address(&mut errors, "cross_chain.router_address", &cross_chain.router_address);
        check_base_units(&mut errors, "cross_chain.amount", &cross_chain.amount);
        check_base_units(&mut errors, "cross_chain.approve_amount", &cross_chain.approve_amount);

        if cross_chain.src_chain == cross_chain.dst_chain {
            errors.push(ValidationError::new(
                "cross_chain.dst_chain",
                "must differ from cross_chain.src_chain",
            ));
        }
    }

    // Return all errors if any were found
    if !errors.is_empty() {
        let error_msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigError::ValidationError(error_msg));
    }

    Ok(())
}

/// Validate a URL
pub fn validate_url(url: &str) -> std::result::Result<(), String> {
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    // Basic URL validation - check for scheme
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("URL must start with http:// or https://".to_string());
    }

    Ok(())
}

/// Validate a `0x`-prefixed 20-byte address
pub fn validate_address(address: &str) -> std::result::Result<(), String> {
    if address.is_empty() {
        return Err("address cannot be empty".to_string());
    }

    if !is_hex_address(address) {
        return Err(format!("`{address}` is not a 0x-prefixed 20-byte hex address"));
    }

    Ok(())
}

/// Validate log level
fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    match level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new(
            "logging.level",
            format!(
                "invalid log level '{level}', must be one of: trace, debug, info, warn, error"
            ),
        )),
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, url: &str) {
    if let Err(e) = validate_url(url) {
        errors.push(ValidationError::new(field, e));
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &str, address: &str) {
    if let Err(e) = validate_address(address) {
        errors.push(ValidationError::new(field, e));
    }
}

fn check_base_units(errors: &mut Vec<ValidationError>, field: &str, amount: &str) {
    if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit()) {
        errors.push(ValidationError::new(
            field,
            "must be a non-empty integer amount in base units",
        ));
    }
}
