//! Kaspa block header.
//!
//! Every field is consensus-critical and appears in the header hash. The
//! hashing serialization is little-endian with `u64` count prefixes for the
//! nested parents structure and a length-prefixed, trimmed big-endian
//! encoding for the arbitrary-precision blue work.

use crate::hashing::{DomainHash, DomainHasher};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Parent block hashes for one DAG superblock level.
pub type BlockLevelParents = Vec<DomainHash>;

/// A Kaspa block header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KaspaHeader {
    /// Block structure version; not the protocol version.
    pub version: u16,
    /// Parent hashes of the block in the DAG, per superblock level.
    pub parents: Vec<BlockLevelParents>,
    /// Merkle root over all transactions of the block.
    pub hash_merkle_root: DomainHash,
    /// Merkle root over the transactions accepted from the block's blues.
    pub accepted_id_merkle_root: DomainHash,
    /// ECMH commitment to the block UTXO set.
    pub utxo_commitment: DomainHash,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Compact difficulty target.
    pub bits: u32,
    /// Proof-of-work nonce.
    pub nonce: u64,
    /// Difficulty-adjustment score of the block.
    pub daa_score: u64,
    /// Number of blue blocks in the block's past.
    pub blue_score: u64,
    /// Cumulative blue work, arbitrary precision.
    pub blue_work: BigUint,
    /// The block's pruning point.
    pub pruning_point: DomainHash,
}

impl KaspaHeader {
    /// The parents at the lowest superblock level.
    pub fn direct_parents(&self) -> &[DomainHash] {
        self.parents.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The header hash, over every consensus field.
    pub fn hash(&self) -> DomainHash {
        let mut hasher = DomainHasher::block_hash();
        self.write_for_hashing(&mut hasher, self.timestamp, self.nonce);
        hasher.finalize()
    }

    /// The pre-PoW hash: the header with timestamp and nonce zeroed.
    ///
    /// This commits to everything the miner cannot grind, and seeds the
    /// heavy-hash matrix.
    pub fn pre_pow_hash(&self) -> DomainHash {
        let mut hasher = DomainHasher::block_hash();
        self.write_for_hashing(&mut hasher, 0, 0);
        hasher.finalize()
    }

    fn write_for_hashing(&self, hasher: &mut DomainHasher, timestamp: u64, nonce: u64) {
        hasher.write(&self.version.to_le_bytes());
        hasher.write(&(self.parents.len() as u64).to_le_bytes());
        for level in &self.parents {
            hasher.write(&(level.len() as u64).to_le_bytes());
            for parent in level {
                hasher.write(parent.as_bytes());
            }
        }
        hasher.write(self.hash_merkle_root.as_bytes());
        hasher.write(self.accepted_id_merkle_root.as_bytes());
        hasher.write(self.utxo_commitment.as_bytes());
        hasher.write(&timestamp.to_le_bytes());
        hasher.write(&self.bits.to_le_bytes());
        hasher.write(&nonce.to_le_bytes());
        hasher.write(&self.daa_score.to_le_bytes());
        hasher.write(&self.blue_score.to_le_bytes());
        // Blue work hashes as its trimmed big-endian bytes, length-prefixed;
        // zero is the empty string.
        let blue_work = if self.blue_work.is_zero() {
            Vec::new()
        } else {
            self.blue_work.to_bytes_be()
        };
        hasher.write(&(blue_work.len() as u64).to_le_bytes());
        hasher.write(&blue_work);
        hasher.write(self.pruning_point.as_bytes());
    }
}
