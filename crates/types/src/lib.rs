pub mod evm;
pub mod keys;
pub mod network;
pub mod order;
pub mod payload;
pub mod protected;

pub use evm::*;
pub use network::*;
pub use order::*;
pub use payload::*;
pub use protected::*;

/// Sentinel recorded for any protected field that could not be read
pub const NOT_AVAILABLE: &str = "N/A";
