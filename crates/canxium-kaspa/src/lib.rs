//! # canxium-kaspa
//!
//! Kaspa foreign-chain primitives for the Canxium cross-mining verifier.
//!
//! This crate provides:
//! - Domain-separated hashing (keyed BLAKE2b-256 and cSHAKE256) matching the
//!   Kaspa reference implementation bit-for-bit
//! - Compact difficulty-bits decoding and the consensus difficulty scalar
//! - Kaspa block header and coinbase-transaction structures with their
//!   consensus hashing serializations
//! - kHeavyHash proof-of-work verification (xoshiro256++-seeded matrix,
//!   heavy-hash transform, little-endian target comparison)
//! - Merkle-branch verification of coinbase inclusion
//! - The RLP wire codec for the auxiliary proof-of-work attachment
//!
//! ## kHeavyHash
//!
//! Kaspa's PoW hashes a header with its timestamp and nonce zeroed (the
//! "pre-PoW hash"), derives a full-rank 64x64 matrix of 4-bit values from
//! that hash, and folds the matrix over the cSHAKE256 digest of
//! `pre_pow_hash || timestamp || padding || nonce`. The resulting digest is
//! compared against the compact-encoded target as a little-endian integer.

mod address;
pub mod block;
mod compact;
mod error;
pub mod hashing;
pub mod header;
mod matrix;
pub mod pow;
pub mod transaction;
pub mod wire;

pub use address::{Address, AddressParseError, ADDRESS_SIZE};
pub use block::{KaspaBlock, MINER_TAG_PREFIX};
pub use compact::{compact_to_target, difficulty_from_bits, max_target, target_to_compact};
pub use error::KaspaError;
pub use hashing::{merkle_branch_hash, DomainHash, DomainHasher, PowHasher, HASH_SIZE};
pub use header::{BlockLevelParents, KaspaHeader};
pub use pow::PowState;
pub use transaction::{
    KaspaTransaction, Outpoint, TransactionInput, TransactionOutput, SUBNETWORK_ID_SIZE,
};
pub use wire::{decode_block, encode_block, WireError};
