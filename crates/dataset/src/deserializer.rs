//! Reader for the protected dataset the platform decrypts into the worker.
//!
//! The dataset is either an unpacked directory holding one file per key
//! (nested keys live in sub-directories) or a single JSON document. In both
//! cases nested keys are addressed with `.`, e.g. `invoice.amount`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::{DatasetError, DatasetValue, ProtectedDataStore, Result, ValueKind};

enum Loaded {
    Directory(PathBuf),
    Document(Value),
}

/// [`ProtectedDataStore`] over the worker's dataset file
///
/// The dataset is located and parsed on the first read, then reused.
pub struct DatasetDeserializer {
    path: Option<PathBuf>,
    loaded: OnceCell<Loaded>,
}

impl DatasetDeserializer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            loaded: OnceCell::new(),
        }
    }

    /// A deserializer for a run without a dataset; every read fails
    pub fn unprovisioned() -> Self {
        Self {
            path: None,
            loaded: OnceCell::new(),
        }
    }

    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::new(path),
            None => Self::unprovisioned(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn loaded(&self) -> Result<&Loaded> {
        let path = self.path.as_ref().ok_or(DatasetError::NotProvisioned)?;
        self.loaded.get_or_try_init(|| load(path)).await
    }
}

async fn load(path: &Path) -> Result<Loaded> {
    let io_err = |source: std::io::Error| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
    if metadata.is_dir() {
        info!(path = %path.display(), "using unpacked dataset directory");
        return Ok(Loaded::Directory(path.to_path_buf()));
    }

    let raw = tokio::fs::read(path).await.map_err(io_err)?;
    let document = serde_json::from_slice(&raw)
        .map_err(|e| DatasetError::Malformed(format!("{}: {e}", path.display())))?;

    info!(path = %path.display(), "loaded dataset document");
    Ok(Loaded::Document(document))
}

#[async_trait]
impl ProtectedDataStore for DatasetDeserializer {
    async fn get_value(&self, key: &str, kind: ValueKind) -> Result<DatasetValue> {
        let value = match self.loaded().await? {
            Loaded::Directory(root) => read_entry(root, key, kind).await?,
            Loaded::Document(document) => lookup(document, key, kind)?,
        };
        debug!(key, %kind, "dataset value decoded");
        Ok(value)
    }
}

fn entry_path(root: &Path, key: &str) -> Result<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in key.split('.') {
        if segment.is_empty() || segment == ".." {
            return Err(DatasetError::Malformed(format!("invalid key `{key}`")));
        }
        path.push(segment);
    }
    Ok(path)
}

async fn read_entry(root: &Path, key: &str, kind: ValueKind) -> Result<DatasetValue> {
    let path = entry_path(root, key)?;
    let raw = match tokio::fs::read(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DatasetError::KeyNotFound(key.to_string()))
        }
        Err(source) => return Err(DatasetError::Io { path, source }),
    };

    let mismatch = || DatasetError::TypeMismatch {
        key: key.to_string(),
        expected: kind,
    };

    match kind {
        ValueKind::Binary => Ok(DatasetValue::Binary(raw)),
        ValueKind::String => String::from_utf8(raw)
            .map(DatasetValue::String)
            .map_err(|_| mismatch()),
        ValueKind::Bool => match raw.as_slice() {
            [0] | b"false" => Ok(DatasetValue::Bool(false)),
            [1] | b"true" => Ok(DatasetValue::Bool(true)),
            _ => Err(mismatch()),
        },
        ValueKind::F64 => std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .map(DatasetValue::F64)
            .ok_or_else(mismatch),
    }
}

fn lookup(document: &Value, key: &str, kind: ValueKind) -> Result<DatasetValue> {
    let value = key
        .split('.')
        .try_fold(document, |node, segment| node.get(segment))
        .ok_or_else(|| DatasetError::KeyNotFound(key.to_string()))?;

    let mismatch = || DatasetError::TypeMismatch {
        key: key.to_string(),
        expected: kind,
    };

    match kind {
        ValueKind::String => value
            .as_str()
            .map(|s| DatasetValue::String(s.to_string()))
            .ok_or_else(mismatch),
        ValueKind::Bool => value.as_bool().map(DatasetValue::Bool).ok_or_else(mismatch),
        ValueKind::F64 => value.as_f64().map(DatasetValue::F64).ok_or_else(mismatch),
        // binary values are stored hex encoded
        ValueKind::Binary => value
            .as_str()
            .and_then(|s| hex::decode(s.strip_prefix("0x").unwrap_or(s)).ok())
            .map(DatasetValue::Binary)
            .ok_or_else(mismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_reads_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("protectedData.json");
        fs::write(
            &path,
            r#"{"invoiceId":"INV-7","paid":true,"total":12.5,"blob":"0x0102","meta":{"note":"hi"}}"#,
        )
        .unwrap();

        let store = DatasetDeserializer::new(&path);

        assert_eq!(
            store.get_value("invoiceId", ValueKind::String).await.unwrap(),
            DatasetValue::String("INV-7".to_string())
        );
        assert_eq!(
            store.get_value("paid", ValueKind::Bool).await.unwrap(),
            DatasetValue::Bool(true)
        );
        assert_eq!(
            store.get_value("total", ValueKind::F64).await.unwrap(),
            DatasetValue::F64(12.5)
        );
        assert_eq!(
            store.get_value("blob", ValueKind::Binary).await.unwrap(),
            DatasetValue::Binary(vec![1, 2])
        );
        assert_eq!(
            store.get_value("meta.note", ValueKind::String).await.unwrap(),
            DatasetValue::String("hi".to_string())
        );
    }

    #[tokio::test]
    async fn test_reads_directory_dataset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("amount"), "12.5").unwrap();
        fs::write(dir.path().join("flag"), [1u8]).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("wallet"), "0xabc").unwrap();

        let store = DatasetDeserializer::new(dir.path());

        assert_eq!(
            store.get_value("amount", ValueKind::String).await.unwrap(),
            DatasetValue::String("12.5".to_string())
        );
        assert_eq!(
            store.get_value("amount", ValueKind::F64).await.unwrap(),
            DatasetValue::F64(12.5)
        );
        assert_eq!(
            store.get_value("flag", ValueKind::Bool).await.unwrap(),
            DatasetValue::Bool(true)
        );
        assert_eq!(
            store.get_value("nested.wallet", ValueKind::String).await.unwrap(),
            DatasetValue::String("0xabc".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetDeserializer::new(dir.path());

        assert!(matches!(
            store.get_value("chain", ValueKind::String).await,
            Err(DatasetError::KeyNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_wrong_type_in_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"amount": 12.5}"#).unwrap();

        let store = DatasetDeserializer::new(&path);
        assert!(matches!(
            store.get_value("amount", ValueKind::String).await,
            Err(DatasetError::TypeMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_parent_segments_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetDeserializer::new(dir.path());

        assert!(matches!(
            store.get_value("...secret", ValueKind::String).await,
            Err(DatasetError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_unprovisioned_store_fails_every_read() {
        let store = DatasetDeserializer::from_path(None);
        assert!(matches!(
            store.get_value("invoiceId", ValueKind::String).await,
            Err(DatasetError::NotProvisioned)
        ));
    }

    #[tokio::test]
    async fn test_non_json_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.zip");
        fs::write(&path, [0x50, 0x4b, 0x03, 0x04]).unwrap();

        let store = DatasetDeserializer::new(&path);
        assert!(matches!(
            store.get_value("invoiceId", ValueKind::String).await,
            Err(DatasetError::Malformed(_))
        ));
    }
}
