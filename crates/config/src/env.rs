//! Confidential-compute worker environment

use crate::RunnerConfig;
use std::fmt;
use std::path::PathBuf;

/// App secret field holding the sender wallet private key
pub const WALLET_KEY_FIELD: &str = "WalletPk";

/// Application secret provisioned to the worker
///
/// Expected to be a JSON object; any other value is kept as a raw string.
#[derive(Clone, Default, PartialEq)]
pub enum AppSecret {
    #[default]
    Unset,
    Json { raw: String, value: serde_json::Value },
    Raw(String),
}

impl AppSecret {
    pub fn parse(raw: Option<String>) -> Self {
        match raw {
            None => Self::Unset,
            Some(raw) if raw.is_empty() => Self::Unset,
            Some(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(value) => Self::Json { raw, value },
                Err(e) => {
                    tracing::debug!(error = %e, "app secret is not JSON, keeping raw value");
                    Self::Raw(raw)
                }
            },
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// `WalletPk` of a JSON object secret
    pub fn wallet_private_key(&self) -> Option<String> {
        match self {
            Self::Json { value, .. } => value
                .as_object()
                .and_then(|map| map.get(WALLET_KEY_FIELD))
                .and_then(|v| v.as_str())
                .filter(|key| !key.is_empty())
                .map(str::to_string),
            _ => None,
        }
    }

    /// The secret with every character masked
    pub fn redacted(&self) -> String {
        match self {
            Self::Unset => "App secret is not set".to_string(),
            Self::Json { raw, .. } | Self::Raw(raw) => "*".repeat(raw.chars().count()),
        }
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AppSecret({})", self.redacted())
    }
}

/// Environment handed to the worker by the confidential-compute platform
#[derive(Clone, Default)]
pub struct WorkerEnv {
    /// `IEXEC_OUT`
    pub out_dir: Option<PathBuf>,
    /// `IEXEC_IN`
    pub in_dir: Option<PathBuf>,
    /// `IEXEC_DATASET_FILENAME`
    pub dataset_filename: Option<String>,
    /// `IEXEC_APP_DEVELOPER_SECRET`
    pub app_secret: AppSecret,
    /// `RPC_URL`
    pub rpc_url: Option<String>,
    /// `FROM_PRIVATE_KEY`
    pub from_private_key: Option<String>,
    /// `TO_ADDRESS`
    pub to_address: Option<String>,
    /// `ERC20_ADDRESS`
    pub erc20_address: Option<String>,
    /// `ERC20_DECIMALS`
    pub erc20_decimals: Option<String>,
    /// `ONEINCH_API_KEY`
    pub oneinch_api_key: Option<String>,
}

impl fmt::Debug for WorkerEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerEnv")
            .field("out_dir", &self.out_dir)
            .field("in_dir", &self.in_dir)
            .field("dataset_filename", &self.dataset_filename)
            .field("app_secret", &self.app_secret)
            .field("rpc_url", &self.rpc_url)
            .field("from_private_key", &self.from_private_key.as_ref().map(|_| "<redacted>"))
            .field("to_address", &self.to_address)
            .field("erc20_address", &self.erc20_address)
            .field("erc20_decimals", &self.erc20_decimals)
            .field("oneinch_api_key", &self.oneinch_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl WorkerEnv {
    /// Capture from the process environment
    pub fn from_process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Capture through an arbitrary lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            out_dir: get("IEXEC_OUT").map(PathBuf::from),
            in_dir: get("IEXEC_IN").map(PathBuf::from),
            dataset_filename: get("IEXEC_DATASET_FILENAME"),
            app_secret: AppSecret::parse(get("IEXEC_APP_DEVELOPER_SECRET")),
            rpc_url: get("RPC_URL"),
            from_private_key: get("FROM_PRIVATE_KEY"),
            to_address: get("TO_ADDRESS"),
            erc20_address: get("ERC20_ADDRESS"),
            erc20_decimals: get("ERC20_DECIMALS"),
            oneinch_api_key: get("ONEINCH_API_KEY"),
        }
    }

    /// Sender key: `FROM_PRIVATE_KEY`, then the app secret's `WalletPk`
    pub fn sender_private_key(&self) -> Option<String> {
        self.from_private_key
            .clone()
            .or_else(|| self.app_secret.wallet_private_key())
    }

    /// Location of the protected dataset, when the platform provided one
    pub fn dataset_path(&self) -> Option<PathBuf> {
        match (&self.in_dir, &self.dataset_filename) {
            (Some(dir), Some(name)) => Some(dir.join(name)),
            _ => None,
        }
    }

    /// Overlay the worker environment on a loaded configuration
    ///
    /// ERC-20 values are copied unchecked; a malformed one fails only the
    /// payout stage.
    pub fn apply(&self, config: &mut RunnerConfig) {
        if let Some(dir) = &self.out_dir {
            config.output.dir = dir.clone();
        }
        if let Some(rpc_url) = &self.rpc_url {
            config.erc20.rpc_url = rpc_url.clone();
        }
        if let Some(to_address) = &self.to_address {
            tracing::warn!(to_address = %to_address, "TO_ADDRESS ignored, the payout goes to the protected wallet");
        }
        if let Some(token) = &self.erc20_address {
            config.erc20.token_address = token.clone();
        }
        if let Some(decimals) = &self.erc20_decimals {
            config.erc20.decimals = Some(decimals.clone());
        }
        if let Some(key) = &self.oneinch_api_key {
            config.cross_chain.auth_key = key.clone();
        }
    }
}
