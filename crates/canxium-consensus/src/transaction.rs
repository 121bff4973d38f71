//! The cross-mining transaction type.
//!
//! An EIP-1559-shaped transaction with an explicit sender, an auxiliary
//! foreign block and its own type byte. Transactions are immutable once
//! signed; the verifier never mutates them.

use crate::crosschain::{ForeignBlock, PoWAlgorithm};
use crate::error::{ConsensusError, ConsensusResult};
use canxium_kaspa::wire::{put_biguint, put_bytes, put_list, put_uint, Walker};
use canxium_kaspa::{Address, WireError};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Type byte of the legacy merge-mining transaction.
pub const MERGE_MINING_TX_TYPE: u8 = 0x04;

/// Type byte of the cross-mining transaction.
pub const CROSS_MINING_TX_TYPE: u8 = 0x05;

/// A cross-mining transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossMiningTx {
    /// Chain identifier for replay protection.
    pub chain_id: BigUint,
    /// Sender account nonce.
    pub nonce: u64,
    /// Max priority fee per gas.
    pub gas_tip_cap: BigUint,
    /// Max fee per gas.
    pub gas_fee_cap: BigUint,
    /// Gas limit.
    pub gas: u64,
    /// Sender address, explicit to prevent replay across senders.
    pub from: Address,
    /// Receiver; must be the mining contract.
    pub to: Address,
    /// Claimed reward; must equal the computed mining reward.
    pub value: BigUint,
    /// Contract calldata; must equal the synthesized cross-mining call.
    pub data: Vec<u8>,
    /// The auxiliary foreign block backing the claim.
    pub aux_pow: Option<ForeignBlock>,
    /// Signature V.
    pub v: BigUint,
    /// Signature R.
    pub r: BigUint,
    /// Signature S.
    pub s: BigUint,
}

impl CrossMiningTx {
    /// The transaction type byte.
    pub fn tx_type(&self) -> u8 {
        CROSS_MINING_TX_TYPE
    }

    /// The difficulty of the attached auxiliary block, zero when absent.
    pub fn difficulty(&self) -> BigUint {
        self.aux_pow
            .as_ref()
            .map(ForeignBlock::difficulty)
            .unwrap_or_else(BigUint::zero)
    }

    /// The proof-of-work algorithm backing the claim.
    pub fn algorithm(&self) -> PoWAlgorithm {
        self.aux_pow
            .as_ref()
            .map(ForeignBlock::algorithm)
            .unwrap_or(PoWAlgorithm::None)
    }

    /// Encode the transaction: its type byte followed by the RLP list.
    pub fn encode(&self) -> Vec<u8> {
        let aux_pow = self
            .aux_pow
            .as_ref()
            .map(ForeignBlock::encode)
            .unwrap_or_default();

        let mut payload = Vec::new();
        put_biguint(&mut payload, &self.chain_id);
        put_uint(&mut payload, self.nonce);
        put_biguint(&mut payload, &self.gas_tip_cap);
        put_biguint(&mut payload, &self.gas_fee_cap);
        put_uint(&mut payload, self.gas);
        put_bytes(&mut payload, self.from.as_bytes());
        put_bytes(&mut payload, self.to.as_bytes());
        put_biguint(&mut payload, &self.value);
        put_bytes(&mut payload, &self.data);
        put_bytes(&mut payload, &aux_pow);
        put_biguint(&mut payload, &self.v);
        put_biguint(&mut payload, &self.r);
        put_biguint(&mut payload, &self.s);

        let mut out = vec![CROSS_MINING_TX_TYPE];
        put_list(&mut out, &payload);
        out
    }

    /// Decode a transaction from its typed encoding.
    pub fn decode(data: &[u8]) -> ConsensusResult<Self> {
        let (&tx_type, body) = data.split_first().ok_or_else(|| {
            ConsensusError::MalformedBlock("empty transaction envelope".to_string())
        })?;
        if tx_type != CROSS_MINING_TX_TYPE {
            return Err(ConsensusError::MalformedBlock(format!(
                "unexpected transaction type {tx_type:#04x}"
            )));
        }

        let mut outer = Walker::new(body);
        let mut fields = outer.list("transaction").map_err(wire_err)?;
        outer.finish("transaction").map_err(wire_err)?;

        let chain_id = fields.biguint("chain id").map_err(wire_err)?;
        let nonce = fields.uint("nonce").map_err(wire_err)?;
        let gas_tip_cap = fields.biguint("gas tip cap").map_err(wire_err)?;
        let gas_fee_cap = fields.biguint("gas fee cap").map_err(wire_err)?;
        let gas = fields.uint("gas").map_err(wire_err)?;
        let from = address(fields.bytes("from").map_err(wire_err)?)?;
        let to = address(fields.bytes("to").map_err(wire_err)?)?;
        let value = fields.biguint("value").map_err(wire_err)?;
        let data = fields.bytes("data").map_err(wire_err)?.to_vec();
        let aux_pow_bytes = fields.bytes("aux pow").map_err(wire_err)?;
        let v = fields.biguint("v").map_err(wire_err)?;
        let r = fields.biguint("r").map_err(wire_err)?;
        let s = fields.biguint("s").map_err(wire_err)?;
        fields.finish("transaction").map_err(wire_err)?;

        let aux_pow = if aux_pow_bytes.is_empty() {
            None
        } else {
            Some(ForeignBlock::decode(aux_pow_bytes)?)
        };

        Ok(Self {
            chain_id,
            nonce,
            gas_tip_cap,
            gas_fee_cap,
            gas,
            from,
            to,
            value,
            data,
            aux_pow,
            v,
            r,
            s,
        })
    }
}

fn wire_err(err: WireError) -> ConsensusError {
    ConsensusError::MalformedBlock(err.to_string())
}

fn address(bytes: &[u8]) -> ConsensusResult<Address> {
    Address::from_slice(bytes).ok_or_else(|| {
        ConsensusError::MalformedBlock("address field must be 20 bytes".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx(aux_pow: Option<ForeignBlock>) -> CrossMiningTx {
        CrossMiningTx {
            chain_id: BigUint::from(3003u32),
            nonce: 7,
            gas_tip_cap: BigUint::from(1_000_000_000u64),
            gas_fee_cap: BigUint::from(2_000_000_000u64),
            gas: 100_000,
            from: Address::new([0x11; 20]),
            to: Address::new([0x22; 20]),
            value: BigUint::from(600u32),
            data: vec![0x97, 0xb8, 0xf2, 0xfc, 0x00],
            aux_pow,
            v: BigUint::from(1u32),
            r: BigUint::from(0xdeadbeefu64),
            s: BigUint::from(0xfeedfaceu64),
        }
    }

    #[test]
    fn test_roundtrip_without_aux_pow() {
        let tx = sample_tx(None);
        let decoded = CrossMiningTx::decode(&tx.encode()).unwrap();
        assert_eq!(decoded, tx);
        assert!(decoded.difficulty().is_zero());
        assert_eq!(decoded.algorithm(), PoWAlgorithm::None);
    }

    #[test]
    fn test_decode_rejects_wrong_type_byte() {
        let mut encoded = sample_tx(None).encode();
        encoded[0] = 0x02;
        assert!(matches!(
            CrossMiningTx::decode(&encoded),
            Err(ConsensusError::MalformedBlock(_))
        ));
        assert!(CrossMiningTx::decode(&[]).is_err());
    }

    #[test]
    fn test_decode_rejects_short_address() {
        let tx = sample_tx(None);
        let mut payload = Vec::new();
        put_biguint(&mut payload, &tx.chain_id);
        put_uint(&mut payload, tx.nonce);
        put_biguint(&mut payload, &tx.gas_tip_cap);
        put_biguint(&mut payload, &tx.gas_fee_cap);
        put_uint(&mut payload, tx.gas);
        put_bytes(&mut payload, &[0x11; 19]); // truncated sender
        put_bytes(&mut payload, tx.to.as_bytes());
        put_biguint(&mut payload, &tx.value);
        put_bytes(&mut payload, &tx.data);
        put_bytes(&mut payload, &[]);
        put_biguint(&mut payload, &tx.v);
        put_biguint(&mut payload, &tx.r);
        put_biguint(&mut payload, &tx.s);
        let mut encoded = vec![CROSS_MINING_TX_TYPE];
        put_list(&mut encoded, &payload);

        assert!(matches!(
            CrossMiningTx::decode(&encoded),
            Err(ConsensusError::MalformedBlock(_))
        ));
    }
}
