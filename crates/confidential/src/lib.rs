pub mod balance;
pub mod error;
pub mod relay;
pub mod token;
pub mod transfer;

pub use balance::*;
pub use error::*;
pub use relay::*;
pub use token::*;
pub use transfer::*;
