//! Append-only, hash-chained ledger with optional proof-of-work.
//!
//! A [`chain::Ledger`] owns an ordered list of [`Block`]s. Every block stores
//! the hash of its predecessor, so editing any block after the fact is caught
//! by [`chain::Ledger::validate`].

pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod hashing;
pub mod pow;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub use chain::{create_ledger, validate_chain, Ledger};
pub use config::{HashingConfig, LedgerConfig};
pub use error::{LedgerError, Result, ValidationCheck, ValidationMismatch};
pub use hashing::{Argon2Finalizer, HashStrategy, SingleHash};

pub type Hash = [u8; 32];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    /// Unix seconds.
    pub timestamp: u64,
    /// Opaque payload, hashed as compact JSON and otherwise never inspected.
    pub transactions: Value,
    pub previous_hash: Hash,
    pub nonce: u64,
    pub(crate) hash: Option<Hash>,
}

impl Block {
    /// Build an unfinalized block. Its hash stays unset until the ledger
    /// finalizes it through a [`HashStrategy`].
    pub fn new(
        index: u64,
        transactions: Value,
        timestamp: u64,
        previous_hash: Hash,
        nonce: u64,
    ) -> Self {
        Self {
            index,
            timestamp,
            transactions,
            previous_hash,
            nonce,
            hash: None,
        }
    }

    /// Canonical encoding fed to every hash function.
    pub fn hash_bytes(&self) -> Vec<u8> {
        let payload = self.transactions.to_string();
        let mut bytes = Vec::with_capacity(8 + 8 + payload.len() + 8 + 32 + 8);
        bytes.extend_from_slice(&self.index.to_le_bytes());
        bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
        bytes.extend_from_slice(payload.as_bytes());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes.extend_from_slice(&self.previous_hash);
        bytes.extend_from_slice(&self.nonce.to_le_bytes());
        bytes
    }

    /// SHA-256 proof hash over [`Block::hash_bytes`].
    pub fn compute_hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.hash_bytes());
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest[..]);
        out
    }

    /// The finalized hash, or `None` while the block is still a candidate.
    pub fn hash(&self) -> Option<Hash> {
        self.hash
    }

    pub fn hash_hex(&self) -> Option<String> {
        self.hash.map(hex::encode)
    }

    pub fn is_finalized(&self) -> bool {
        self.hash.is_some()
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash == constants::GENESIS_PREVIOUS_HASH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_block() -> Block {
        Block::new(1, json!(["alice pays bob 10"]), 1_600_000_200, [0u8; 32], 0)
    }

    #[test]
    fn new_block_is_unfinalized() {
        let block = sample_block();
        assert_eq!(block.hash(), None);
        assert_eq!(block.hash_hex(), None);
        assert!(!block.is_finalized());
        assert_eq!(block.nonce, 0);
    }

    #[test]
    fn hash_bytes_layout() {
        let block = Block::new(1, json!("tx"), 42, [7u8; 32], 9);
        let bytes = block.hash_bytes();
        // payload is the JSON string "\"tx\"", four bytes
        assert_eq!(bytes.len(), 8 + 8 + 4 + 8 + 32 + 8);
        assert_eq!(&bytes[0..8], &1u64.to_le_bytes());
        assert_eq!(&bytes[8..16], &4u64.to_le_bytes());
        assert_eq!(&bytes[16..20], b"\"tx\"");
        assert_eq!(&bytes[20..28], &42u64.to_le_bytes());
        assert_eq!(&bytes[28..60], &[7u8; 32]);
        assert_eq!(&bytes[60..68], &9u64.to_le_bytes());
    }

    #[test]
    fn block_hash_example() {
        let block = sample_block();
        let expected_hex = "93e691dfeacac86cd5a55d754d1eeabc4e13b95b42a0654c4c34df288ffda1fd";
        assert_eq!(hex::encode(block.compute_hash()), expected_hex);
    }

    #[test]
    fn block_hash_consistency() {
        let block = sample_block();
        assert_eq!(block.compute_hash(), block.compute_hash());
        assert_eq!(block.compute_hash(), block.clone().compute_hash());
    }

    #[test]
    fn block_hash_changes_with_each_field() {
        let base = sample_block();
        let base_hash = base.compute_hash();

        let mut b = base.clone();
        b.index += 1;
        assert_ne!(b.compute_hash(), base_hash);

        let mut b = base.clone();
        b.transactions = json!(["alice pays bob 11"]);
        assert_ne!(b.compute_hash(), base_hash);

        let mut b = base.clone();
        b.timestamp += 1;
        assert_ne!(b.compute_hash(), base_hash);

        let mut b = base.clone();
        b.previous_hash[31] = 1;
        assert_ne!(b.compute_hash(), base_hash);

        let mut b = base;
        b.nonce += 1;
        assert_ne!(b.compute_hash(), base_hash);
    }

    #[test]
    fn structured_payload_hash_ignores_key_order() {
        let a = Block::new(1, json!({"from": "alice", "to": "bob"}), 1, [0u8; 32], 0);
        let b = Block::new(1, json!({"to": "bob", "from": "alice"}), 1, [0u8; 32], 0);
        assert_eq!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn genesis_detection() {
        let genesis = Block::new(0, json!(constants::GENESIS_PAYLOAD), 0, [0u8; 32], 0);
        assert!(genesis.is_genesis());
        assert!(!sample_block().is_genesis());
    }

    #[test]
    fn block_serialization_example() {
        let mut block = sample_block();
        block.hash = Some([3u8; 32]);
        let json = serde_json::to_string(&block).unwrap();
        let deserialized: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(block, deserialized);
        assert_eq!(deserialized.hash(), Some([3u8; 32]));
    }
}
