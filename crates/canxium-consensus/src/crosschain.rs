//! Foreign-chain dispatch.
//!
//! Supported foreign chains form a closed set. A [`ForeignBlock`] is a
//! tagged variant over the chains' block types, and every operation the
//! verifier needs is dispatched by match; adding a chain means adding a
//! variant, not implementing an open interface.

use crate::error::{ConsensusError, ConsensusResult};
use canxium_kaspa::{Address, DomainHash, KaspaBlock, KaspaError};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Identifier of a foreign proof-of-work chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum ChainTag {
    /// Reserved zero value; never valid on the wire.
    Unknown = 0,
    /// The Kaspa blockDAG.
    Kaspa = 1,
    /// Reserved for Monero.
    Monero = 2,
}

impl ChainTag {
    /// The numeric tag used on the wire and in contract calldata.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Decode a numeric tag.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Kaspa),
            2 => Some(Self::Monero),
            _ => None,
        }
    }
}

/// Proof-of-work algorithm of a mining claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoWAlgorithm {
    /// No proof of work attached.
    None,
    /// Ethash.
    Ethash,
    /// Double SHA-256.
    Sha256,
    /// Scrypt.
    Scrypt,
    /// Kaspa's kHeavyHash.
    KHeavyHash,
    /// Monero's RandomX.
    RandomX,
}

/// A foreign block attached to a cross-mining transaction as evidence of
/// external mining effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForeignBlock {
    /// A Kaspa block with its coinbase inclusion proof.
    Kaspa(KaspaBlock),
}

impl ForeignBlock {
    /// The chain this block belongs to.
    pub fn chain(&self) -> ChainTag {
        match self {
            Self::Kaspa(_) => ChainTag::Kaspa,
        }
    }

    /// The proof-of-work algorithm securing this block.
    pub fn algorithm(&self) -> PoWAlgorithm {
        match self {
            Self::Kaspa(_) => PoWAlgorithm::KHeavyHash,
        }
    }

    /// Basic structural validity of the attached block.
    pub fn is_valid_block(&self) -> bool {
        match self {
            Self::Kaspa(block) => block.is_valid_block(),
        }
    }

    /// Verify the block's proof of work against its declared target.
    pub fn verify_pow(&self) -> Result<(), KaspaError> {
        match self {
            Self::Kaspa(block) => block.verify_pow(),
        }
    }

    /// The block's raw proof-of-work value, for admission bounds.
    pub fn pow_value(&self) -> BigUint {
        match self {
            Self::Kaspa(block) => block.pow_value(),
        }
    }

    /// Verify the coinbase and its Merkle inclusion proof.
    pub fn verify_coinbase(&self) -> bool {
        match self {
            Self::Kaspa(block) => block.verify_coinbase(),
        }
    }

    /// The Canxium miner address tagged in the coinbase payload.
    pub fn miner_address(&self) -> Result<Address, KaspaError> {
        match self {
            Self::Kaspa(block) => block.miner_address(),
        }
    }

    /// The block's header hash.
    pub fn block_hash(&self) -> DomainHash {
        match self {
            Self::Kaspa(block) => block.block_hash(),
        }
    }

    /// The consensus difficulty scalar of the block.
    pub fn difficulty(&self) -> BigUint {
        match self {
            Self::Kaspa(block) => block.difficulty(),
        }
    }

    /// The block's proof-of-work nonce.
    pub fn pow_nonce(&self) -> u64 {
        match self {
            Self::Kaspa(block) => block.pow_nonce(),
        }
    }

    /// The block timestamp in milliseconds.
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::Kaspa(block) => block.timestamp(),
        }
    }

    /// Encode as a chain-tag byte followed by the chain-specific body.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Kaspa(block) => {
                let body = canxium_kaspa::encode_block(block);
                let mut out = Vec::with_capacity(1 + body.len());
                out.push(ChainTag::Kaspa.as_u16() as u8);
                out.extend_from_slice(&body);
                out
            }
        }
    }

    /// Decode from a chain-tag byte followed by the chain-specific body.
    pub fn decode(data: &[u8]) -> ConsensusResult<Self> {
        let (&tag, body) = data
            .split_first()
            .ok_or_else(|| ConsensusError::MalformedBlock("empty auxiliary block".to_string()))?;
        match ChainTag::from_u16(u16::from(tag)) {
            Some(ChainTag::Kaspa) => Ok(Self::Kaspa(canxium_kaspa::decode_block(body)?)),
            _ => Err(ConsensusError::ChainUnsupported(u16::from(tag))),
        }
    }
}
