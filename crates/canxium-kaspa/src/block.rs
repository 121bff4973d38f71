//! Kaspa auxiliary block: a header, its coinbase transaction and the Merkle
//! branch proving the coinbase belongs to the header's transaction tree.

use crate::address::Address;
use crate::compact::{difficulty_from_bits, max_target};
use crate::error::KaspaError;
use crate::hashing::{merkle_branch_hash, DomainHash};
use crate::header::KaspaHeader;
use crate::pow::PowState;
use crate::transaction::KaspaTransaction;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Payload tag marking the Canxium beneficiary in a foreign coinbase.
pub const MINER_TAG_PREFIX: &[u8] = b"canxiuminer:";

/// Tag prefix plus 40 hex characters of address.
const MINER_TAG_LEN: usize = MINER_TAG_PREFIX.len() + 2 * crate::address::ADDRESS_SIZE;

/// A Kaspa block presented as auxiliary proof of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KaspaBlock {
    /// The block header, fully populated.
    pub header: KaspaHeader,
    /// Sibling hashes from the coinbase leaf up to the Merkle root. Empty
    /// when the coinbase hash is itself the root.
    pub merkle_branch: Vec<DomainHash>,
    /// The block's coinbase transaction.
    pub coinbase: KaspaTransaction,
}

impl KaspaBlock {
    /// Basic structural sanity; anything deeper is the PoW and coinbase
    /// verifiers' job.
    pub fn is_valid_block(&self) -> bool {
        self.header.nonce != 0
            && self.header.timestamp != 0
            && self.header.bits != 0
            && !self.coinbase.payload.is_empty()
    }

    /// Verify the header's proof of work.
    pub fn verify_pow(&self) -> Result<(), KaspaError> {
        let state = PowState::new(&self.header);

        // The target must be strictly positive...
        if state.target().is_zero() {
            return Err(KaspaError::NonPositiveTarget);
        }
        // ...and no higher than the chain allows.
        if state.target() > &max_target() {
            return Err(KaspaError::TargetAboveMaximum);
        }

        if !state.check_pow() {
            debug!(block = %self.header.hash(), "heavy hash above target");
            return Err(KaspaError::InvalidProofOfWork);
        }
        Ok(())
    }

    /// The block's proof-of-work value as a 256-bit integer, independent of
    /// whether it meets the target.
    pub fn pow_value(&self) -> BigUint {
        PowState::new(&self.header).pow_value()
    }

    /// Verify the coinbase: it must satisfy the coinbase predicate and fold
    /// through the Merkle branch to the header's declared root.
    pub fn verify_coinbase(&self) -> bool {
        if !self.coinbase.is_coinbase() {
            return false;
        }
        self.verify_merkle_branch()
    }

    fn verify_merkle_branch(&self) -> bool {
        let mut computed = self.coinbase.hash();
        for sibling in &self.merkle_branch {
            computed = merkle_branch_hash(&computed, sibling);
        }
        computed == self.header.hash_merkle_root
    }

    /// Extract the Canxium miner address from the tail of the coinbase
    /// payload: `canxiuminer:` followed by 40 hex characters.
    pub fn miner_address(&self) -> Result<Address, KaspaError> {
        let payload = &self.coinbase.payload;
        if payload.len() < MINER_TAG_LEN {
            return Err(KaspaError::PayloadTooShort {
                len: payload.len(),
            });
        }

        let tag = &payload[payload.len() - MINER_TAG_LEN..];
        if !tag.starts_with(MINER_TAG_PREFIX) {
            return Err(KaspaError::MissingMinerTag);
        }

        let hex = std::str::from_utf8(&tag[MINER_TAG_PREFIX.len()..])
            .map_err(|_| KaspaError::MissingMinerTag)?;
        Ok(Address::from_hex(hex)?)
    }

    /// The consensus difficulty scalar of the block.
    pub fn difficulty(&self) -> BigUint {
        difficulty_from_bits(self.header.bits)
    }

    /// The proof-of-work nonce.
    pub fn pow_nonce(&self) -> u64 {
        self.header.nonce
    }

    /// The block timestamp in milliseconds.
    pub fn timestamp(&self) -> u64 {
        self.header.timestamp
    }

    /// The header hash.
    pub fn block_hash(&self) -> DomainHash {
        self.header.hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{Outpoint, TransactionInput, TransactionOutput};

    const MINER_HEX: &str = "c0ffee254729296a45a3885639ac7e10f9d54979";

    fn coinbase_with_payload(payload: Vec<u8>) -> KaspaTransaction {
        let mut subnetwork_id = [0u8; 20];
        subnetwork_id[0] = 1;
        KaspaTransaction {
            version: 0,
            inputs: vec![TransactionInput {
                previous_outpoint: Outpoint {
                    transaction_id: DomainHash::default(),
                    index: u32::MAX,
                },
                signature_script: Vec::new(),
                sig_op_count: 0,
                sequence: 0,
            }],
            outputs: vec![TransactionOutput {
                value: 5_000_000_000,
                script_version: 0,
                script_public_key: vec![0xac],
            }],
            lock_time: 0,
            subnetwork_id,
            gas: 0,
            payload,
        }
    }

    fn tagged_payload() -> Vec<u8> {
        let mut payload = b"pool-data/".to_vec();
        payload.extend_from_slice(MINER_TAG_PREFIX);
        payload.extend_from_slice(MINER_HEX.as_bytes());
        payload
    }

    fn block_with_coinbase(coinbase: KaspaTransaction) -> KaspaBlock {
        let root = coinbase.hash();
        KaspaBlock {
            header: KaspaHeader {
                version: 1,
                parents: vec![vec![DomainHash::new([0x10; 32])]],
                hash_merkle_root: root,
                accepted_id_merkle_root: DomainHash::new([0x21; 32]),
                utxo_commitment: DomainHash::new([0x22; 32]),
                timestamp: 1_704_067_305_000,
                bits: 0x2000_20bd,
                nonce: 1,
                daa_score: 1,
                blue_score: 1,
                blue_work: BigUint::from(1u32),
                pruning_point: DomainHash::new([0x23; 32]),
            },
            merkle_branch: Vec::new(),
            coinbase,
        }
    }

    #[test]
    fn test_miner_address_extraction() {
        let block = block_with_coinbase(coinbase_with_payload(tagged_payload()));
        let miner = block.miner_address().unwrap();
        assert_eq!(miner, Address::from_hex(MINER_HEX).unwrap());
    }

    #[test]
    fn test_miner_address_requires_tag() {
        let block = block_with_coinbase(coinbase_with_payload(vec![0u8; 64]));
        assert_eq!(block.miner_address(), Err(KaspaError::MissingMinerTag));
    }

    #[test]
    fn test_miner_address_short_payload() {
        let block = block_with_coinbase(coinbase_with_payload(b"short".to_vec()));
        assert_eq!(
            block.miner_address(),
            Err(KaspaError::PayloadTooShort { len: 5 })
        );
    }

    #[test]
    fn test_miner_address_bad_hex() {
        let mut payload = MINER_TAG_PREFIX.to_vec();
        payload.extend_from_slice(&[b'z'; 40]);
        let block = block_with_coinbase(coinbase_with_payload(payload));
        assert!(matches!(
            block.miner_address(),
            Err(KaspaError::InvalidMinerAddress(_))
        ));
    }

    #[test]
    fn test_verify_coinbase_empty_branch() {
        // Empty branch is valid only when the coinbase hash is the root.
        let block = block_with_coinbase(coinbase_with_payload(tagged_payload()));
        assert!(block.verify_coinbase());

        let mut wrong_root = block.clone();
        wrong_root.header.hash_merkle_root = DomainHash::new([0x77; 32]);
        assert!(!wrong_root.verify_coinbase());
    }

    #[test]
    fn test_verify_coinbase_with_branch() {
        let mut block = block_with_coinbase(coinbase_with_payload(tagged_payload()));
        let sibling = DomainHash::new([0x42; 32]);
        block.header.hash_merkle_root = merkle_branch_hash(&block.coinbase.hash(), &sibling);
        block.merkle_branch = vec![sibling];
        assert!(block.verify_coinbase());

        // Flipping a sibling byte breaks inclusion.
        let mut tampered = block.clone();
        let mut bytes = *tampered.merkle_branch[0].as_bytes();
        bytes[0] ^= 1;
        tampered.merkle_branch[0] = DomainHash::new(bytes);
        assert!(!tampered.verify_coinbase());
    }

    #[test]
    fn test_verify_coinbase_rejects_non_coinbase() {
        let mut coinbase = coinbase_with_payload(tagged_payload());
        coinbase.inputs[0].previous_outpoint.transaction_id = DomainHash::new([9u8; 32]);
        let block = block_with_coinbase(coinbase);
        assert!(!block.verify_coinbase());
    }

    #[test]
    fn test_is_valid_block_structural_checks() {
        let block = block_with_coinbase(coinbase_with_payload(tagged_payload()));
        assert!(block.is_valid_block());

        let mut no_nonce = block.clone();
        no_nonce.header.nonce = 0;
        assert!(!no_nonce.is_valid_block());

        let mut no_time = block.clone();
        no_time.header.timestamp = 0;
        assert!(!no_time.is_valid_block());

        let mut no_bits = block.clone();
        no_bits.header.bits = 0;
        assert!(!no_bits.is_valid_block());

        let mut no_payload = block;
        no_payload.coinbase.payload.clear();
        assert!(!no_payload.is_valid_block());
    }

    #[test]
    fn test_verify_pow_rejects_sign_bit_target() {
        let mut block = block_with_coinbase(coinbase_with_payload(tagged_payload()));
        block.header.bits = 0x1992_3456; // sign bit set, decodes to zero
        assert_eq!(block.verify_pow(), Err(KaspaError::NonPositiveTarget));
    }

    #[test]
    fn test_difficulty_from_header_bits() {
        let block = block_with_coinbase(coinbase_with_payload(tagged_payload()));
        assert_eq!(block.difficulty(), BigUint::from(1000u32));
    }
}
