//! The cross-mining transaction verification pipeline.
//!
//! Checks run in a fixed order and short-circuit on the first failure. The
//! cheap structural and policy checks come first; the heavy-hash evaluation
//! and the Merkle walk run only on transactions that survive them.

use crate::calldata::build_cross_mining_calldata;
use crate::chain_config::ChainConfig;
use crate::crosschain::{ChainTag, ForeignBlock};
use crate::engine::HostHeader;
use crate::error::{ConsensusError, ConsensusResult};
use crate::reward;
use crate::transaction::CrossMiningTx;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, instrument};

/// Milliseconds a foreign block may run ahead of the parent block.
pub const ALLOWED_FUTURE_BLOCK_TIME_MS: u64 = 12_000;

/// Post-Lithium admission bound: the PoW value must be strictly below
/// `2^256 / 512`. Targets top out at `2^255 - 1`, so this is an extra
/// filter on top of the target comparison, not a replacement for it.
fn lithium_pow_bound() -> BigUint {
    BigUint::one() << 247u32
}

fn checkpoint(cancel: &AtomicBool) -> ConsensusResult<()> {
    if cancel.load(Ordering::Relaxed) {
        Err(ConsensusError::Cancelled)
    } else {
        Ok(())
    }
}

/// Whether cross mining for the block's chain is active at the parent time.
fn is_supported_cross_mining(config: &ChainConfig, block: &ForeignBlock, parent_time: u64) -> bool {
    match block.chain() {
        ChainTag::Kaspa => config.is_helium(parent_time),
        _ => false,
    }
}

/// Verify one cross-mining transaction against the parent header.
pub fn verify_cross_mining_tx(
    config: &ChainConfig,
    tx: &CrossMiningTx,
    parent: &HostHeader,
) -> ConsensusResult<()> {
    static NO_CANCEL: AtomicBool = AtomicBool::new(false);
    verify_cross_mining_tx_cancellable(config, tx, parent, &NO_CANCEL)
}

/// Verify one cross-mining transaction, checking the cancellation flag
/// between the major stages.
#[instrument(skip_all, fields(nonce = tx.nonce, parent_time = parent.time))]
pub fn verify_cross_mining_tx_cancellable(
    config: &ChainConfig,
    tx: &CrossMiningTx,
    parent: &HostHeader,
    cancel: &AtomicBool,
) -> ConsensusResult<()> {
    // 1. An auxiliary block must be present at all.
    let block = tx.aux_pow.as_ref().ok_or(ConsensusError::NilBlock)?;

    // 2. The block must be structurally complete before anything is hashed.
    if !block.is_valid_block() {
        return Err(ConsensusError::MalformedBlock(
            "auxiliary block is missing required fields".to_string(),
        ));
    }

    // 3. The chain must be active at the parent's time.
    if !is_supported_cross_mining(config, block, parent.time) {
        return Err(ConsensusError::ChainUnsupported(block.chain().as_u16()));
    }

    // 4. Post-Lithium blocks pass a hash-bound admission filter before the
    // expensive full verification.
    checkpoint(cancel)?;
    if config.is_lithium(parent.time)
        && block.chain() == ChainTag::Kaspa
        && block.pow_value() >= lithium_pow_bound()
    {
        return Err(ConsensusError::InvalidPoWHashBound);
    }

    // 5. Only the mining contract may receive the claim.
    if tx.to != config.mining_contract {
        return Err(ConsensusError::InvalidReceiver);
    }

    // 6. The difficulty must be positive and at least the chain minimum.
    let difficulty = tx.difficulty();
    if difficulty.is_zero() {
        return Err(ConsensusError::InvalidDifficulty);
    }
    let min = config.min_difficulty(block.chain());
    if difficulty < min {
        return Err(ConsensusError::DifficultyUnderValue {
            got: difficulty,
            min,
        });
    }

    // 7. The foreign timestamp must fall between the fork and a short
    // window past the parent block.
    let fork_time = match config.cross_mining_fork_time(block.chain()) {
        Some(fork_time) => fork_time,
        None => return Err(ConsensusError::ChainUnsupported(block.chain().as_u16())),
    };
    let timestamp = block.timestamp();
    if timestamp < fork_time * 1000 {
        return Err(ConsensusError::InvalidBlockTime { timestamp });
    }
    let limit = parent.time * 1000 + ALLOWED_FUTURE_BLOCK_TIME_MS;
    if timestamp > limit {
        return Err(ConsensusError::InvalidFutureBlock { timestamp, limit });
    }

    // 8. The claimed value must equal the scheduled reward exactly.
    let expected = reward::cross_mining_reward(
        block,
        fork_time,
        parent.time,
        config.is_lithium(parent.time),
    );
    if tx.value != expected {
        return Err(ConsensusError::InvalidTxValue {
            got: tx.value.clone(),
            expected,
        });
    }

    // 9. The foreign proof of work must hold.
    checkpoint(cancel)?;
    block.verify_pow().map_err(ConsensusError::InvalidPoW)?;

    // 10. The coinbase must belong to the header and name a miner.
    checkpoint(cancel)?;
    if !block.verify_coinbase() {
        return Err(ConsensusError::InvalidCoinbase);
    }
    let miner = block.miner_address().map_err(ConsensusError::InvalidPayload)?;

    // 11. The calldata must be the synthesized contract call, bit for bit.
    let calldata = build_cross_mining_calldata(block.chain(), &miner, timestamp);
    if calldata != tx.data {
        return Err(ConsensusError::InvalidCalldata);
    }

    debug!(miner = %miner, value = %tx.value, "cross mining transaction verified");
    Ok(())
}
