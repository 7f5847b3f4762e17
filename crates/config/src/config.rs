//! Core configuration structures for the confidential payout worker

use payout_types::keys::{COMPUTED_FILE_NAME, RESULT_FILE_NAME};
use payout_types::NetworkId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Confidential token deployed on Sepolia, also the ERC-20 payout token
pub const CONFIDENTIAL_TOKEN_ADDRESS: &str = "0x5a3F7a5eAa4e6910e3835Bc900173e4BcA37e560";

/// Main runner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Output artifact locations
    #[serde(default)]
    pub output: OutputConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Confidential (FHE) transfer stage
    #[serde(default)]
    pub confidential_transfer: ConfidentialTransferConfig,

    /// Cross-chain swap stage
    #[serde(default)]
    pub cross_chain: CrossChainConfig,

    /// Plain ERC-20 payout stage
    #[serde(default)]
    pub erc20: Erc20Config,
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the worker writes its artifacts to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Human-readable summary file name
    #[serde(default = "default_result_file")]
    pub result_file: String,

    /// JSON status document file name
    #[serde(default = "default_computed_file")]
    pub computed_file: String,
}

impl OutputConfig {
    pub fn result_path(&self) -> PathBuf {
        self.dir.join(&self.result_file)
    }

    pub fn computed_path(&self) -> PathBuf {
        self.dir.join(&self.computed_file)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

/// Confidential transfer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidentialTransferConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON-RPC endpoint of the chain hosting the confidential token
    #[serde(default = "default_confidential_rpc_url")]
    pub rpc_url: String,

    /// Encryption relay endpoint
    #[serde(default = "default_relayer_url")]
    pub relayer_url: String,

    /// ERC-7984 confidential token contract
    #[serde(default = "default_confidential_token")]
    pub token_contract: String,

    /// Address allowed to import the ciphertexts
    #[serde(default = "default_confidential_user")]
    pub user_address: String,

    /// Transfer recipient
    #[serde(default = "default_confidential_recipient")]
    pub recipient: String,

    /// Amount in token base units
    #[serde(default = "default_confidential_amount")]
    pub amount: u64,

    /// Token decimals, used only for display
    #[serde(default = "default_stablecoin_decimals")]
    pub decimals: u8,

    /// Record the cleartext amount in logs and output artifacts
    #[serde(default)]
    pub disclose_amount: bool,

    /// Verifying contract of user-decryption authorizations
    #[serde(default = "default_decryption_contract")]
    pub decryption_contract: String,

    /// Chain id of the decryption gateway, used in the EIP-712 domain
    #[serde(default = "default_gateway_chain_id")]
    pub gateway_chain_id: u64,

    /// Validity of a user-decryption authorization
    #[serde(default = "default_decrypt_duration_days")]
    pub decrypt_duration_days: u32,
}

/// Cross-chain swap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossChainConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Swap aggregator base URL
    #[serde(default = "default_aggregator_url")]
    pub api_url: String,

    /// Aggregator API key
    #[serde(default)]
    pub auth_key: String,

    /// JSON-RPC endpoint of the source chain
    #[serde(default = "default_cross_chain_node_url")]
    pub node_url: String,

    /// Order maker address
    #[serde(default = "default_maker_address")]
    pub maker_address: String,

    #[serde(default = "default_src_chain")]
    pub src_chain: NetworkId,

    #[serde(default = "default_dst_chain")]
    pub dst_chain: NetworkId,

    #[serde(default = "default_src_token")]
    pub src_token: String,

    #[serde(default = "default_dst_token")]
    pub dst_token: String,

    /// Amount in source-token base units
    #[serde(default = "default_swap_amount")]
    pub amount: String,

    /// Swap source and destination before quoting
    #[serde(default)]
    pub invert: bool,

    /// Ask the aggregator for an estimate with the quote
    #[serde(default = "default_true")]
    pub enable_estimate: bool,

    /// Aggregation router approved to spend the source token
    #[serde(default = "default_router_address")]
    pub router_address: String,

    /// Allowance granted to the router, in base units
    #[serde(default = "default_approve_amount")]
    pub approve_amount: String,
}

/// Plain ERC-20 payout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Erc20Config {
    /// JSON-RPC endpoint
    #[serde(default = "default_erc20_rpc_url")]
    pub rpc_url: String,

    /// Token contract
    #[serde(default = "default_confidential_token")]
    pub token_address: String,

    /// Decimals override as given, e.g. `"6"`; resolved from `stablecoins`
    /// when unset. Parsed only when the payout runs.
    #[serde(default)]
    pub decimals: Option<String>,

    /// Token contracts known to use 6 decimals
    #[serde(default = "default_stablecoins")]
    pub stablecoins: Vec<String>,
}

impl Erc20Config {
    /// Decimals for `token_address`: explicit override, then the stablecoin
    /// list, then the ERC-20 default of 18
    pub fn resolve_decimals(&self) -> String {
        if let Some(decimals) = self.decimals.as_deref().filter(|d| !d.trim().is_empty()) {
            return decimals.to_string();
        }

        let is_stablecoin = self
            .stablecoins
            .iter()
            .any(|s| s.eq_ignore_ascii_case(self.token_address.trim()));

        if is_stablecoin {
            default_stablecoin_decimals().to_string()
        } else {
            DEFAULT_TOKEN_DECIMALS.to_string()
        }
    }
}

/// Decimals assumed for tokens not listed as stablecoins
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

// Default value functions
fn default_output_dir() -> PathBuf {
    PathBuf::from("/iexec_out")
}

fn default_result_file() -> String {
    RESULT_FILE_NAME.to_string()
}

fn default_computed_file() -> String {
    COMPUTED_FILE_NAME.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_confidential_rpc_url() -> String {
    "https://1rpc.io/sepolia".to_string()
}

fn default_relayer_url() -> String {
    "https://relayer.testnet.zama.cloud".to_string()
}

fn default_confidential_token() -> String {
    CONFIDENTIAL_TOKEN_ADDRESS.to_string()
}

fn default_confidential_user() -> String {
    "0x2191433264B3E4F50439b3822323EC14448B192c".to_string()
}

fn default_confidential_recipient() -> String {
    "0x6BbFd1F6dC17322a6e8923cf8072a735A081a975".to_string()
}

fn default_confidential_amount() -> u64 {
    1_000_000 // 1 token with 6 decimals
}

fn default_stablecoin_decimals() -> u8 {
    6
}

fn default_decryption_contract() -> String {
    "0xb6E160B1ff80D67Bfe90A85eE06Ce0A2613607D1".to_string()
}

fn default_gateway_chain_id() -> u64 {
    55815
}

fn default_decrypt_duration_days() -> u32 {
    10
}

fn default_aggregator_url() -> String {
    "https://api.1inch.dev/fusion-plus".to_string()
}

fn default_cross_chain_node_url() -> String {
    "https://api.zan.top/arb-one".to_string()
}

fn default_maker_address() -> String {
    "0xe8F413337d1c3B742fBf1A00269EBeeb0148d00a".to_string()
}

fn default_src_chain() -> NetworkId {
    NetworkId::Arbitrum
}

fn default_dst_chain() -> NetworkId {
    NetworkId::Coinbase
}

fn default_src_token() -> String {
    "0xaf88d065e77c8cC2239327C5EDb3A432268e5831".to_string() // USDC on Arbitrum
}

fn default_dst_token() -> String {
    "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string() // USDC on Base
}

fn default_swap_amount() -> String {
    "1000000".to_string()
}

fn default_router_address() -> String {
    "0x111111125421ca6dc452d289314280a0f8842a65".to_string() // aggregation router v6
}

fn default_approve_amount() -> String {
    "10000000".to_string()
}

fn default_erc20_rpc_url() -> String {
    "https://sepolia-rollup.arbitrum.io/rpc".to_string()
}

fn default_stablecoins() -> Vec<String> {
    vec![CONFIDENTIAL_TOKEN_ADDRESS.to_string()]
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            result_file: default_result_file(),
            computed_file: default_computed_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for ConfidentialTransferConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rpc_url: default_confidential_rpc_url(),
            relayer_url: default_relayer_url(),
            token_contract: default_confidential_token(),
            user_address: default_confidential_user(),
            recipient: default_confidential_recipient(),
            amount: default_confidential_amount(),
            decimals: default_stablecoin_decimals(),
            disclose_amount: false,
            decryption_contract: default_decryption_contract(),
            gateway_chain_id: default_gateway_chain_id(),
            decrypt_duration_days: default_decrypt_duration_days(),
        }
    }
}

impl Default for CrossChainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_aggregator_url(),
            auth_key: String::new(),
            node_url: default_cross_chain_node_url(),
            maker_address: default_maker_address(),
            src_chain: default_src_chain(),
            dst_chain: default_dst_chain(),
            src_token: default_src_token(),
            dst_token: default_dst_token(),
            amount: default_swap_amount(),
            invert: false,
            enable_estimate: true,
            router_address: default_router_address(),
            approve_amount: default_approve_amount(),
        }
    }
}

impl Default for Erc20Config {
    fn default() -> Self {
        Self {
            rpc_url: default_erc20_rpc_url(),
            token_address: default_confidential_token(),
            decimals: None,
            stablecoins: default_stablecoins(),
        }
    }
}
