pub mod artifacts;
pub mod connector;
pub mod document;
pub mod error;
pub mod report;
pub mod runner;
pub mod stages;
pub mod telemetry;

pub use artifacts::*;
pub use connector::*;
pub use document::*;
pub use error::*;
pub use report::*;
pub use runner::*;
pub use stages::*;
pub use telemetry::*;
