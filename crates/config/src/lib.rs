//! Configuration management for the confidential payout worker
//!
//! This crate provides:
//! - Runner configuration with defaults matching the Sepolia deployment
//! - Loading from TOML, YAML or JSON files with `PAYOUT_` environment overrides
//! - Capture of the confidential-compute worker environment and app secret
//! - Config validation

mod config;
mod env;
mod loader;
mod validation;

pub use config::*;
pub use env::*;
pub use loader::*;
pub use validation::*;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    #[error("Config library error: {0}")]
    ConfigLibError(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
