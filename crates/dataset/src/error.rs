use std::path::PathBuf;

use thiserror::Error;

use crate::ValueKind;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("protected dataset is not provisioned")]
    NotProvisioned,

    #[error("failed to read dataset at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset: {0}")]
    Malformed(String),

    #[error("key `{0}` not found in dataset")]
    KeyNotFound(String),

    #[error("key `{key}` does not hold a {expected} value")]
    TypeMismatch { key: String, expected: ValueKind },

    #[error("dataset store unavailable: {0}")]
    Unavailable(String),
}
