//! Error taxonomy for cross-mining verification.
//!
//! Every failure is fatal for the transaction under verification; validators
//! return the first error they detect and the facade surfaces it unchanged.

use canxium_kaspa::{KaspaError, WireError};
use num_bigint::BigUint;
use thiserror::Error;

/// Cross-mining verification errors.
#[derive(Error, Debug)]
pub enum ConsensusError {
    /// The transaction carries no auxiliary block at all.
    #[error("cross mining transaction carries no auxiliary block")]
    NilBlock,

    /// Structural failure before any cryptography: the auxiliary block
    /// failed to decode or is missing required fields.
    #[error("malformed auxiliary block: {0}")]
    MalformedBlock(String),

    /// The auxiliary chain tag is not currently enabled.
    #[error("auxiliary chain {0} is not supported")]
    ChainUnsupported(u16),

    /// Target positivity, target bound, or hash-vs-target failure.
    #[error("invalid auxiliary proof of work: {0}")]
    InvalidPoW(KaspaError),

    /// The post-Lithium admission filter failed.
    #[error("auxiliary proof-of-work hash exceeds the admission bound")]
    InvalidPoWHashBound,

    /// The coinbase predicate or the Merkle inclusion proof failed.
    #[error("invalid auxiliary coinbase")]
    InvalidCoinbase,

    /// The coinbase payload does not identify a Canxium miner.
    #[error("invalid coinbase payload: {0}")]
    InvalidPayload(KaspaError),

    /// The transaction receiver is not the mining contract.
    #[error("transaction receiver is not the mining contract")]
    InvalidReceiver,

    /// The auxiliary block difficulty is not positive.
    #[error("auxiliary block difficulty is not positive")]
    InvalidDifficulty,

    /// The auxiliary block difficulty is below the per-chain minimum.
    #[error("auxiliary block difficulty {got} is below the chain minimum {min}")]
    DifficultyUnderValue { got: BigUint, min: BigUint },

    /// The auxiliary block predates the fork that enables its chain.
    #[error("auxiliary block timestamp {timestamp} predates the fork")]
    InvalidBlockTime { timestamp: u64 },

    /// The auxiliary block is too far ahead of the parent block.
    #[error("auxiliary block timestamp {timestamp} is in the future (limit {limit})")]
    InvalidFutureBlock { timestamp: u64, limit: u64 },

    /// The transaction value does not equal the computed reward.
    #[error("transaction value {got} does not match the mining reward {expected}")]
    InvalidTxValue { got: BigUint, expected: BigUint },

    /// The transaction calldata is not the synthesized contract call.
    #[error("transaction calldata does not match the synthesized contract call")]
    InvalidCalldata,

    /// A plain transaction tried to invoke the cross-mining contract method.
    #[error("direct call to the cross-mining contract method is not allowed")]
    UnauthorizedDirectCall,

    /// This engine never verifies block headers.
    #[error("canxium engine verifies offline mining transactions only")]
    HeaderVerificationUnsupported,

    /// A consensus table does not match its manifest.
    #[error("consensus table {table} does not match its manifest")]
    TableManifestMismatch { table: &'static str },

    /// The caller abandoned the batch this transaction belonged to.
    #[error("verification cancelled")]
    Cancelled,
}

impl From<WireError> for ConsensusError {
    fn from(err: WireError) -> Self {
        Self::MalformedBlock(err.to_string())
    }
}

/// Result type for consensus operations.
pub type ConsensusResult<T> = Result<T, ConsensusError>;
