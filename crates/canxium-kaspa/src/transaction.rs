//! Kaspa transaction structures.
//!
//! The verifier only ever sees one transaction per auxiliary block, its
//! coinbase, but the hashing serialization below covers the full
//! transaction shape so that the computed leaf hash matches the one the
//! foreign network committed into the header's Merkle root.

use crate::hashing::{DomainHash, DomainHasher};
use serde::{Deserialize, Serialize};

/// Size of a subnetwork identifier in bytes.
pub const SUBNETWORK_ID_SIZE: usize = 20;

/// A reference to an output of a previous transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outpoint {
    /// Hash of the transaction holding the output; all zeros for a coinbase.
    pub transaction_id: DomainHash,
    /// Index of the output within that transaction.
    pub index: u32,
}

/// A transaction input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// The output being spent.
    pub previous_outpoint: Outpoint,
    /// Unlocking script.
    pub signature_script: Vec<u8>,
    /// Number of signature operations in the unlocking script.
    pub sig_op_count: u8,
    /// Relative lock-time sequence.
    pub sequence: u64,
}

/// A transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Amount in sompi.
    pub value: u64,
    /// Script public key version.
    pub script_version: u16,
    /// Locking script.
    pub script_public_key: Vec<u8>,
}

/// A Kaspa transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KaspaTransaction {
    /// Transaction structure version.
    pub version: u16,
    /// Inputs being spent.
    pub inputs: Vec<TransactionInput>,
    /// Outputs being created.
    pub outputs: Vec<TransactionOutput>,
    /// Absolute lock time.
    pub lock_time: u64,
    /// Subnetwork the transaction belongs to.
    pub subnetwork_id: [u8; SUBNETWORK_ID_SIZE],
    /// Gas limit for subnetwork execution.
    pub gas: u64,
    /// Arbitrary payload; carries the miner tag for a coinbase.
    pub payload: Vec<u8>,
}

impl KaspaTransaction {
    /// Whether this transaction is the block's coinbase: its first input
    /// spends the conventional all-zero outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.inputs
            .first()
            .map(|input| input.previous_outpoint.transaction_id.is_zero())
            .unwrap_or(false)
    }

    /// The transaction hash used as the Merkle tree leaf.
    pub fn hash(&self) -> DomainHash {
        let mut hasher = DomainHasher::transaction_hash();
        self.write_for_hashing(&mut hasher);
        hasher.finalize()
    }

    fn write_for_hashing(&self, hasher: &mut DomainHasher) {
        hasher.write(&self.version.to_le_bytes());
        hasher.write(&(self.inputs.len() as u64).to_le_bytes());
        for input in &self.inputs {
            hasher.write(input.previous_outpoint.transaction_id.as_bytes());
            hasher.write(&input.previous_outpoint.index.to_le_bytes());
            write_var_bytes(hasher, &input.signature_script);
            hasher.write(&[input.sig_op_count]);
            hasher.write(&input.sequence.to_le_bytes());
        }
        hasher.write(&(self.outputs.len() as u64).to_le_bytes());
        for output in &self.outputs {
            hasher.write(&output.value.to_le_bytes());
            hasher.write(&output.script_version.to_le_bytes());
            write_var_bytes(hasher, &output.script_public_key);
        }
        hasher.write(&self.lock_time.to_le_bytes());
        hasher.write(&self.subnetwork_id);
        hasher.write(&self.gas.to_le_bytes());
        write_var_bytes(hasher, &self.payload);
    }
}

fn write_var_bytes(hasher: &mut DomainHasher, data: &[u8]) {
    hasher.write(&(data.len() as u64).to_le_bytes());
    hasher.write(data);
}
