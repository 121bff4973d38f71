//! Error types for Kaspa block verification.

use crate::address::AddressParseError;
use thiserror::Error;

/// Failures while verifying a Kaspa auxiliary block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KaspaError {
    /// The decoded compact target is zero or its sign bit is set.
    #[error("block target difficulty is not positive")]
    NonPositiveTarget,

    /// The decoded target exceeds the chain maximum of `2^255 - 1`.
    #[error("block target difficulty is higher than the chain maximum")]
    TargetAboveMaximum,

    /// The header's heavy hash does not meet its declared target.
    #[error("block has invalid proof of work")]
    InvalidProofOfWork,

    /// The coinbase payload cannot carry a full miner tag.
    #[error("coinbase payload of {len} bytes is too short to carry a miner tag")]
    PayloadTooShort { len: usize },

    /// The coinbase payload does not end with the miner tag prefix.
    #[error("coinbase payload does not end with a canxiuminer tag")]
    MissingMinerTag,

    /// The miner tag's address characters are not valid hex.
    #[error("miner tag address is invalid: {0}")]
    InvalidMinerAddress(#[from] AddressParseError),
}
