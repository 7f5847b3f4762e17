//! Key names of the `computed.json` status document.
//!
//! Each stage owns a distinct prefix so entries from different stages never
//! collide when the document is assembled.

pub const DETERMINISTIC_OUTPUT_PATH: &str = "deterministic-output-path";
pub const PROTECTED_DATA: &str = "protected-data";
pub const ERROR_MESSAGE: &str = "error-message";

pub const SECRET_TRANSFER_TX_HASH: &str = "secret-transfer-tx-hash";
pub const SECRET_TRANSFER_AMOUNT: &str = "secret-transfer-amount";
pub const SECRET_TRANSFER_CONTRACT: &str = "secret-transfer-contract";
pub const SECRET_TRANSFER_ERROR: &str = "secret-transfer-error";

pub const CROSS_CHAIN_ORDER_HASH: &str = "cross-chain-order-hash";
pub const CROSS_CHAIN_SRC_CHAIN: &str = "cross-chain-src-chain";
pub const CROSS_CHAIN_DST_CHAIN: &str = "cross-chain-dst-chain";
pub const CROSS_CHAIN_AMOUNT: &str = "cross-chain-amount";
pub const CROSS_CHAIN_ERROR: &str = "cross-chain-error";

pub const ERC20_TX_HASH: &str = "erc20-tx-hash";
pub const ERC20_ERROR: &str = "erc20-error";

pub const RESULT_FILE_NAME: &str = "result.txt";
pub const COMPUTED_FILE_NAME: &str = "computed.json";
