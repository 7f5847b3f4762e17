pub mod aggregator;
pub mod error;
pub mod fusion;
pub mod hashlock;
pub mod order;

pub use aggregator::*;
pub use error::*;
pub use fusion::*;
pub use hashlock::*;
pub use order::*;
