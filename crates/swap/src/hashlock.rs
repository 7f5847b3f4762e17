//! Secrets and hash-locks of cross-chain orders.
//!
//! A single-fill order locks on the hash of its one secret. A multiple-fill
//! order commits to every secret at once: leaf `i` is
//! `keccak256(uint64(i) ++ secretHash_i)` and the lock is the root of a
//! sorted-pair keccak Merkle tree over the sorted leaves, with its top 16
//! bits carrying `leaf count - 1`.

use std::fmt;

use ethers::types::H256;
use ethers::utils::keccak256;
use payout_types::decode_hex;

use crate::{Result, SwapError};

/// A 32-byte hash-lock preimage
#[derive(Clone, PartialEq, Eq)]
pub struct Secret([u8; 32]);

impl Secret {
    pub fn random() -> Result<Self> {
        let mut bytes = [0u8; 32];
        getrandom::getrandom(&mut bytes).map_err(|e| SwapError::Entropy(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// `0x` followed by 64 lowercase hex characters
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn hash(&self) -> H256 {
        H256(keccak256(self.0))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Fresh random secrets, one per fill segment
pub fn generate_secrets(count: u32) -> Result<Vec<Secret>> {
    if count == 0 {
        return Err(SwapError::InvalidSecretsCount(count));
    }
    (0..count).map(|_| Secret::random()).collect()
}

/// keccak256 of a hex-encoded secret's bytes
pub fn hash_secret(secret: &str) -> Result<H256> {
    Ok(H256(keccak256(decode_hex(secret)?)))
}

/// Leaf committing to the secret of fill segment `index`
pub fn multi_fill_leaf(index: u64, secret_hash: H256) -> H256 {
    let mut packed = [0u8; 40];
    packed[..8].copy_from_slice(&index.to_be_bytes());
    packed[8..].copy_from_slice(secret_hash.as_bytes());
    H256(keccak256(packed))
}

fn hash_pair(a: H256, b: H256) -> H256 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let mut packed = [0u8; 64];
    packed[..32].copy_from_slice(low.as_bytes());
    packed[32..].copy_from_slice(high.as_bytes());
    H256(keccak256(packed))
}

/// Root of a sorted-leaf, sorted-pair Merkle tree
///
/// Laid out as a complete binary tree in an array of `2n - 1` nodes with the
/// leaves at the end, so unbalanced trees match the usual on-chain verifier.
pub fn merkle_root(leaves: &[H256]) -> Option<H256> {
    if leaves.is_empty() {
        return None;
    }

    let mut sorted = leaves.to_vec();
    sorted.sort();

    let n = sorted.len();
    let mut tree = vec![H256::zero(); 2 * n - 1];
    for (i, leaf) in sorted.into_iter().enumerate() {
        tree[2 * n - 2 - i] = leaf;
    }
    for i in (0..n - 1).rev() {
        tree[i] = hash_pair(tree[2 * i + 1], tree[2 * i + 2]);
    }

    Some(tree[0])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashLock {
    SingleFill(H256),
    MultipleFills { root: H256, parts: u16 },
}

impl HashLock {
    pub fn for_single_fill(secret: &Secret) -> Self {
        HashLock::SingleFill(secret.hash())
    }

    /// Lock over per-segment leaves, see [`multi_fill_leaf`]
    pub fn for_multiple_fills(leaves: &[H256]) -> Result<Self> {
        if leaves.len() < 2 {
            return Err(SwapError::TooFewLeaves(leaves.len()));
        }
        let parts =
            u16::try_from(leaves.len() - 1).map_err(|_| SwapError::TooFewLeaves(leaves.len()))?;
        let root = merkle_root(leaves).ok_or(SwapError::TooFewLeaves(0))?;

        let mut bytes = root.to_fixed_bytes();
        bytes[..2].copy_from_slice(&parts.to_be_bytes());

        Ok(HashLock::MultipleFills {
            root: H256(bytes),
            parts,
        })
    }

    /// Lock for the given secrets, choosing the fill mode by their number
    pub fn for_secrets(secrets: &[Secret]) -> Result<Self> {
        match secrets {
            [] => Err(SwapError::InvalidSecretsCount(0)),
            [single] => Ok(Self::for_single_fill(single)),
            many => {
                let leaves: Vec<H256> = many
                    .iter()
                    .enumerate()
                    .map(|(i, secret)| multi_fill_leaf(i as u64, secret.hash()))
                    .collect();
                Self::for_multiple_fills(&leaves)
            }
        }
    }

    pub fn value(&self) -> H256 {
        match self {
            HashLock::SingleFill(hash) => *hash,
            HashLock::MultipleFills { root, .. } => *root,
        }
    }

    pub fn is_multi_fill(&self) -> bool {
        matches!(self, HashLock::MultipleFills { .. })
    }
}

impl fmt::Display for HashLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.value())
    }
}
