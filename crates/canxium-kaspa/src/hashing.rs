//! Domain-separated hashing primitives.
//!
//! Kaspa keeps every hash domain distinct: block hashes, transaction hashes
//! and Merkle branch hashes are keyed BLAKE2b-256 where the domain string is
//! the key, while the two proof-of-work hashes are cSHAKE256 with the domain
//! as the customization string. The domain constructors here are the only
//! way to obtain a writer.

use blake2::digest::consts::U32;
use blake2::digest::{FixedOutput, KeyInit, Update};
use blake2::Blake2bMac;
use serde::{Deserialize, Serialize};
use sha3::digest::{ExtendableOutput, Update as XofUpdate, XofReader};
use sha3::{CShake256, CShake256Core};
use std::fmt;
use subtle::ConstantTimeEq;

/// Size of every domain hash in bytes.
pub const HASH_SIZE: usize = 32;

const BLOCK_HASH_DOMAIN: &[u8] = b"BlockHash";
const TRANSACTION_HASH_DOMAIN: &[u8] = b"TransactionHash";
const MERKLE_BRANCH_HASH_DOMAIN: &[u8] = b"MerkleBranchHash";
const PROOF_OF_WORK_DOMAIN: &[u8] = b"ProofOfWorkHash";
const HEAVY_HASH_DOMAIN: &[u8] = b"HeavyHash";

/// A fixed 32-byte hash value with constant-time equality.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DomainHash([u8; HASH_SIZE]);

impl DomainHash {
    /// Wrap raw bytes as a hash value.
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build a hash from a slice, if it has exactly [`HASH_SIZE`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; HASH_SIZE]>::try_from(bytes).ok().map(Self)
    }

    /// Parse a hash from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// The raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Whether every byte of the hash is zero (the conventional "no previous
    /// transaction" marker in coinbase outpoints).
    pub fn is_zero(&self) -> bool {
        self.0.ct_eq(&[0u8; HASH_SIZE]).into()
    }
}

impl PartialEq for DomainHash {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for DomainHash {}

impl AsRef<[u8]> for DomainHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for DomainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

type KeyedBlake2b = Blake2bMac<U32>;

/// Incremental keyed BLAKE2b-256 writer bound to a single hash domain.
pub struct DomainHasher {
    inner: KeyedBlake2b,
}

impl DomainHasher {
    fn with_domain(domain: &[u8]) -> Self {
        // Domain strings are all well under the 64-byte BLAKE2b key limit.
        let inner = KeyedBlake2b::new_from_slice(domain).expect("domain key fits BLAKE2b");
        Self { inner }
    }

    /// Writer for header hashes.
    pub fn block_hash() -> Self {
        Self::with_domain(BLOCK_HASH_DOMAIN)
    }

    /// Writer for transaction hashes (the Merkle tree leaves).
    pub fn transaction_hash() -> Self {
        Self::with_domain(TRANSACTION_HASH_DOMAIN)
    }

    /// Writer for interior Merkle tree nodes.
    pub fn merkle_branch() -> Self {
        Self::with_domain(MERKLE_BRANCH_HASH_DOMAIN)
    }

    /// Absorb more input.
    pub fn write(&mut self, data: &[u8]) {
        Update::update(&mut self.inner, data);
    }

    /// Finish and produce the hash.
    pub fn finalize(self) -> DomainHash {
        DomainHash(self.inner.finalize_fixed().into())
    }
}

/// Incremental cSHAKE256 writer for the two proof-of-work domains.
pub struct PowHasher {
    inner: CShake256,
}

impl PowHasher {
    /// Writer for the inner proof-of-work digest.
    pub fn proof_of_work() -> Self {
        Self {
            inner: CShake256::from_core(CShake256Core::new(PROOF_OF_WORK_DOMAIN)),
        }
    }

    /// Writer for the final heavy-hash digest.
    pub fn heavy() -> Self {
        Self {
            inner: CShake256::from_core(CShake256Core::new(HEAVY_HASH_DOMAIN)),
        }
    }

    /// Absorb more input.
    pub fn write(&mut self, data: &[u8]) {
        XofUpdate::update(&mut self.inner, data);
    }

    /// Finish and squeeze out the 32-byte digest.
    pub fn finalize(self) -> DomainHash {
        let mut out = [0u8; HASH_SIZE];
        self.inner.finalize_xof().read(&mut out);
        DomainHash(out)
    }
}

/// Hash two sibling tree nodes under the Merkle branch domain.
pub fn merkle_branch_hash(left: &DomainHash, right: &DomainHash) -> DomainHash {
    let mut hasher = DomainHasher::merkle_branch();
    hasher.write(left.as_bytes());
    hasher.write(right.as_bytes());
    hasher.finalize()
}
