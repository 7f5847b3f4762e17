use std::fmt;

use async_trait::async_trait;
use payout_types::{ProtectedInput, PROTECTED_FIELDS};
use tracing::debug;

use crate::{DatasetError, Result};

/// Type requested for a dataset value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Bool,
    F64,
    Binary,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Bool => "bool",
            ValueKind::F64 => "f64",
            ValueKind::Binary => "binary",
        };
        f.write_str(name)
    }
}

/// A typed value decoded from the protected dataset
#[derive(Clone, Debug, PartialEq)]
pub enum DatasetValue {
    String(String),
    Bool(bool),
    F64(f64),
    Binary(Vec<u8>),
}

impl DatasetValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            DatasetValue::String(_) => ValueKind::String,
            DatasetValue::Bool(_) => ValueKind::Bool,
            DatasetValue::F64(_) => ValueKind::F64,
            DatasetValue::Binary(_) => ValueKind::Binary,
        }
    }

    pub fn into_string(self, key: &str) -> Result<String> {
        match self {
            DatasetValue::String(value) => Ok(value),
            _ => Err(DatasetError::TypeMismatch {
                key: key.to_string(),
                expected: ValueKind::String,
            }),
        }
    }
}

/// Key/value access to the decrypted protected dataset
#[async_trait]
pub trait ProtectedDataStore: Send + Sync {
    async fn get_value(&self, key: &str, kind: ValueKind) -> Result<DatasetValue>;
}

/// Read the five invoice fields, in order
///
/// The first failing read aborts the whole batch; values read before it are
/// dropped. Callers substitute [`ProtectedInput::unavailable`] on error.
pub async fn read_protected_input(store: &dyn ProtectedDataStore) -> Result<ProtectedInput> {
    let mut values: [String; 5] = Default::default();

    for (slot, key) in values.iter_mut().zip(PROTECTED_FIELDS) {
        *slot = store
            .get_value(key, ValueKind::String)
            .await?
            .into_string(key)?;
        debug!(key, "protected field read");
    }

    Ok(ProtectedInput::from_values(values))
}
