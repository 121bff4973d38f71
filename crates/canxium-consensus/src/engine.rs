//! The cross-mining engine facade.
//!
//! Composes the verification pipeline and the direct-call guard behind a
//! single entry point. Canxium block production belongs to another engine
//! composed above this one; header verification is refused here
//! unconditionally.

use crate::calldata::is_unauthorized_cross_mining_call;
use crate::chain_config::ChainConfig;
use crate::error::{ConsensusError, ConsensusResult};
use crate::reward::verify_table_manifest;
use crate::transaction::CrossMiningTx;
use crate::verify::{verify_cross_mining_tx, verify_cross_mining_tx_cancellable};
use canxium_kaspa::Address;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::thread;
use tracing::{info, instrument, warn};

/// The host chain's view of a block header; only what the verifier needs.
#[derive(Debug, Clone, Copy)]
pub struct HostHeader {
    /// Block number.
    pub number: u64,
    /// Timestamp in seconds.
    pub time: u64,
}

/// The cross-mining verification engine.
pub struct Engine {
    config: ChainConfig,
}

impl Engine {
    /// Create an engine, verifying the consensus reward tables against
    /// their manifest first. A build with corrupted tables must not serve.
    pub fn new(config: ChainConfig) -> ConsensusResult<Self> {
        verify_table_manifest()?;
        info!(contract = %config.mining_contract, "cross-mining engine ready");
        Ok(Self { config })
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Verify a cross-mining transaction against the parent header.
    pub fn verify_merge_tx(&self, tx: &CrossMiningTx, parent: &HostHeader) -> ConsensusResult<()> {
        verify_cross_mining_tx(&self.config, tx, parent)
    }

    /// Guard to run against every transaction, of any type: rejects plain
    /// transactions that invoke the cross-mining contract method directly.
    pub fn check_unauthorized_call(
        &self,
        tx_type: u8,
        to: Option<&Address>,
        data: &[u8],
    ) -> ConsensusResult<()> {
        if is_unauthorized_cross_mining_call(&self.config, tx_type, to, data) {
            warn!(?to, "plain transaction targeting the cross-mining method");
            return Err(ConsensusError::UnauthorizedDirectCall);
        }
        Ok(())
    }

    /// This engine never verifies block headers.
    pub fn verify_header(&self, _header: &HostHeader, _parent: &HostHeader) -> ConsensusResult<()> {
        Err(ConsensusError::HeaderVerificationUnsupported)
    }

    /// Verify a batch of transactions in parallel.
    ///
    /// Verification is pure and stateless, so transactions fan out across
    /// worker threads and results fan back in over a channel, in input
    /// order. Workers check the cancellation flag between major stages; a
    /// cancelled batch reports [`ConsensusError::Cancelled`] for the
    /// transactions it never finished.
    #[instrument(skip_all, fields(transactions = txs.len()))]
    pub fn verify_batch(
        &self,
        txs: &[CrossMiningTx],
        parent: &HostHeader,
        cancel: &AtomicBool,
    ) -> Vec<ConsensusResult<()>> {
        if txs.is_empty() {
            return Vec::new();
        }

        let workers = thread::available_parallelism()
            .map(usize::from)
            .unwrap_or(1)
            .min(txs.len());

        let mut results: Vec<ConsensusResult<()>> =
            (0..txs.len()).map(|_| Err(ConsensusError::Cancelled)).collect();

        thread::scope(|scope| {
            let (result_tx, result_rx) = mpsc::channel();

            for worker in 0..workers {
                let result_tx = result_tx.clone();
                let config = &self.config;
                scope.spawn(move || {
                    let mut index = worker;
                    while index < txs.len() {
                        let result = verify_cross_mining_tx_cancellable(
                            config,
                            &txs[index],
                            parent,
                            cancel,
                        );
                        if result_tx.send((index, result)).is_err() {
                            return;
                        }
                        index += workers;
                    }
                });
            }
            drop(result_tx);

            for (index, result) in result_rx {
                results[index] = result;
            }
        });

        results
    }
}
