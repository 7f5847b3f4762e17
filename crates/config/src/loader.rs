//! Configuration loading from multiple sources

use crate::{ConfigError, Result, RunnerConfig, WorkerEnv};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;

/// Prefix of environment variables overriding file configuration
pub const ENV_PREFIX: &str = "PAYOUT";

/// Configuration loader with support for multiple formats and sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the configuration a worker run uses
    ///
    /// 1. Built-in defaults
    /// 2. Optional configuration file
    /// 3. `PAYOUT_`-prefixed environment variables, e.g. `PAYOUT_ERC20__RPC_URL`
    /// 4. The confidential-compute worker environment (`IEXEC_OUT`, `RPC_URL`, ...)
    pub fn load(path: Option<&Path>, worker_env: &WorkerEnv) -> Result<RunnerConfig> {
        let mut builder = Self::builder();
        if let Some(path) = path {
            builder = builder.add_file(path, true);
        }

        let mut config = builder.add_env(ENV_PREFIX).build()?;
        worker_env.apply(&mut config);

        tracing::debug!(
            output_dir = %config.output.dir.display(),
            confidential_transfer = config.confidential_transfer.enabled,
            cross_chain = config.cross_chain.enabled,
            "configuration loaded"
        );

        Ok(config)
    }

    /// Build configuration using the config crate's builder pattern
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder {
            builder: Config::builder(),
        }
    }
}

/// Builder for layered configuration loading
pub struct ConfigLoaderBuilder {
    builder: ConfigBuilder<config::builder::DefaultState>,
}

impl ConfigLoaderBuilder {
    /// Add a configuration file source
    pub fn add_file(mut self, path: &Path, required: bool) -> Self {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml, // Default to TOML
        };

        self.builder = self
            .builder
            .add_source(File::from(path).format(format).required(required));
        self
    }

    /// Add environment variable source with prefix
    ///
    /// Nested keys are separated by `__` so field names keep their underscores.
    pub fn add_env(mut self, prefix: &str) -> Self {
        self.builder = self.builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<RunnerConfig> {
        let config = self.builder.build()?;
        config.try_deserialize().map_err(ConfigError::from)
    }
}
