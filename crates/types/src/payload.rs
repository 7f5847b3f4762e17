use ethers::types::Bytes;
use serde::{Deserialize, Serialize};

use crate::{decode_hex, EvmError};

/// Ciphertext handles plus the input proof returned by the encryption relay
///
/// Scoped to one (contract, user) pair and consumed by a single
/// confidential-transfer call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPayload {
    /// `0x`-prefixed 32-byte handles, one per encrypted value
    pub handles: Vec<String>,

    /// `0x`-prefixed proof bytes
    pub input_proof: String,
}

impl EncryptedPayload {
    /// First handle as a `bytes32` argument
    pub fn first_handle(&self) -> Result<[u8; 32], EvmError> {
        let handle = self
            .handles
            .first()
            .ok_or_else(|| EvmError::InvalidHex("relay returned no handles".to_string()))?;

        let raw = decode_hex(handle)?;
        raw.as_slice()
            .try_into()
            .map_err(|_| EvmError::InvalidHex(format!("handle is {} bytes, expected 32", raw.len())))
    }

    pub fn proof_bytes(&self) -> Result<Bytes, EvmError> {
        decode_hex(&self.input_proof).map(Bytes::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_handle_decodes_bytes32() {
        let payload = EncryptedPayload {
            handles: vec![format!("0x{}", "ab".repeat(32))],
            input_proof: "0x0102".to_string(),
        };

        assert_eq!(payload.first_handle().unwrap(), [0xab; 32]);
        assert_eq!(payload.proof_bytes().unwrap().to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_short_handle_rejected() {
        let payload = EncryptedPayload {
            handles: vec!["0xabcd".to_string()],
            input_proof: "0x".to_string(),
        };

        assert!(payload.first_handle().is_err());
    }

    #[test]
    fn test_missing_handle_rejected() {
        let payload = EncryptedPayload {
            handles: vec![],
            input_proof: "0x".to_string(),
        };

        assert!(payload.first_handle().is_err());
    }
}
