pub mod amount;
pub mod error;
pub mod token;
pub mod transfer;

pub use amount::*;
pub use error::*;
pub use token::*;
pub use transfer::*;
