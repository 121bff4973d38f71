//! # canxium-consensus
//!
//! Cross-chain merge-mining verification for the Canxium execution layer.
//!
//! Miners of a supported foreign proof-of-work chain claim rewards on
//! Canxium by submitting a typed transaction that carries one of the foreign
//! chain's blocks as auxiliary proof of work. This crate decides, per
//! transaction and statelessly, whether the claim is admissible and what it
//! is worth:
//!
//! - decode the tagged auxiliary block ([`ForeignBlock`])
//! - recompute the foreign chain's proof of work and compare it to the
//!   compact-encoded target
//! - prove the coinbase belongs to the header via its Merkle branch and
//!   recover the tagged Canxium miner address
//! - price the claim on the piecewise, fork-aware reward schedule
//! - check that the transaction's receiver, value and calldata match the
//!   claim bit for bit
//!
//! The [`Engine`] facade composes these checks and additionally guards the
//! mining contract against direct calls from plain transactions. It verifies
//! offline mining transactions only; block-header verification is delegated
//! to the engine composed above it and is refused here unconditionally.

mod calldata;
mod chain_config;
mod crosschain;
mod engine;
mod error;
pub mod reward;
mod transaction;
mod verify;

pub use calldata::{
    build_cross_mining_calldata, is_unauthorized_cross_mining_call, CALLDATA_LEN,
    CROSS_MINING_SELECTOR, MERGE_MINING_SELECTOR,
};
pub use chain_config::{ChainConfig, ChainConfigError, ChainConfigFile};
pub use crosschain::{ChainTag, ForeignBlock, PoWAlgorithm};
pub use engine::{Engine, HostHeader};
pub use error::{ConsensusError, ConsensusResult};
pub use transaction::{CrossMiningTx, CROSS_MINING_TX_TYPE, MERGE_MINING_TX_TYPE};
pub use verify::{
    verify_cross_mining_tx, verify_cross_mining_tx_cancellable, ALLOWED_FUTURE_BLOCK_TIME_MS,
};

pub use canxium_kaspa::{Address, KaspaBlock};
