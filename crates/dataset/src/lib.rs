pub mod deserializer;
pub mod error;
pub mod store;

pub use deserializer::*;
pub use error::*;
pub use store::*;
