//! Proof-of-work verification state for a Kaspa header.

use crate::compact::compact_to_target;
use crate::hashing::{DomainHash, PowHasher};
use crate::header::KaspaHeader;
use crate::matrix::Matrix;
use num_bigint::BigUint;
use tracing::trace;

/// Everything needed to check one header's proof of work: the target decoded
/// from its compact bits, the pre-PoW hash and the matrix derived from it.
pub struct PowState {
    target: BigUint,
    pre_pow_hash: DomainHash,
    matrix: Matrix,
    timestamp: u64,
    nonce: u64,
}

impl PowState {
    /// Build the verification state for a header.
    pub fn new(header: &KaspaHeader) -> Self {
        let target = compact_to_target(header.bits);
        let pre_pow_hash = header.pre_pow_hash();
        let matrix = Matrix::generate(&pre_pow_hash);
        Self {
            target,
            pre_pow_hash,
            matrix,
            timestamp: header.timestamp,
            nonce: header.nonce,
        }
    }

    /// The 256-bit target decoded from the header's compact bits.
    pub fn target(&self) -> &BigUint {
        &self.target
    }

    /// The proof-of-work value of the header.
    ///
    /// `cSHAKE256(pre_pow_hash || timestamp || 32 zero bytes || nonce)` under
    /// the proof-of-work domain, run through the heavy-hash matrix transform,
    /// interpreted as a little-endian 256-bit integer.
    pub fn pow_value(&self) -> BigUint {
        let mut hasher = PowHasher::proof_of_work();
        hasher.write(self.pre_pow_hash.as_bytes());
        hasher.write(&self.timestamp.to_le_bytes());
        hasher.write(&[0u8; 32]);
        hasher.write(&self.nonce.to_le_bytes());
        let inner = hasher.finalize();

        let heavy = self.matrix.heavy_hash(&inner);
        trace!(heavy = %heavy, "computed heavy hash");
        BigUint::from_bytes_le(heavy.as_bytes())
    }

    /// Whether the proof-of-work value meets the target. The comparison is
    /// inclusive: a value exactly on the target is valid.
    pub fn check_pow(&self) -> bool {
        self.pow_value() <= self.target
    }
}
