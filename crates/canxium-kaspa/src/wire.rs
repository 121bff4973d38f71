//! RLP wire codec for the Kaspa auxiliary proof-of-work attachment.
//!
//! The encoding is a list of three items, `[header, merkle_branch,
//! coinbase]`. The header is its twelve fields in declared order; the
//! parents structure and the Merkle branch are nested lists whose inner
//! byte strings must be empty (parents only) or exactly 32 bytes. The
//! chain-tag prefix byte is the caller's concern; this module deals with the
//! Kaspa body only.

use crate::hashing::DomainHash;
use crate::header::KaspaHeader;
use crate::transaction::{
    KaspaTransaction, Outpoint, TransactionInput, TransactionOutput, SUBNETWORK_ID_SIZE,
};
use crate::block::KaspaBlock;
use alloy_rlp::Header;
use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

/// Failures while decoding a wire-encoded block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The underlying RLP structure is broken.
    #[error("rlp decoding failed: {0}")]
    Rlp(alloy_rlp::Error),

    /// The RLP structure is well formed but does not describe a valid block.
    #[error("malformed {0}")]
    Malformed(&'static str),

    /// Extra bytes after a complete structure.
    #[error("trailing bytes after {0}")]
    Trailing(&'static str),
}

impl From<alloy_rlp::Error> for WireError {
    fn from(err: alloy_rlp::Error) -> Self {
        Self::Rlp(err)
    }
}

// ---------------------------------------------------------------- encoding

/// Append an RLP byte string.
pub fn put_bytes(out: &mut Vec<u8>, data: &[u8]) {
    if data.len() == 1 && data[0] < 0x80 {
        out.push(data[0]);
    } else {
        Header {
            list: false,
            payload_length: data.len(),
        }
        .encode(out);
        out.extend_from_slice(data);
    }
}

/// Append an RLP unsigned integer (trimmed big-endian).
pub fn put_uint(out: &mut Vec<u8>, value: u64) {
    let bytes = value.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    put_bytes(out, &bytes[start..]);
}

/// Append an RLP arbitrary-precision unsigned integer.
pub fn put_biguint(out: &mut Vec<u8>, value: &BigUint) {
    if value.is_zero() {
        put_bytes(out, &[]);
    } else {
        put_bytes(out, &value.to_bytes_be());
    }
}

/// Append an RLP list with the given payload.
pub fn put_list(out: &mut Vec<u8>, payload: &[u8]) {
    Header {
        list: true,
        payload_length: payload.len(),
    }
    .encode(out);
    out.extend_from_slice(payload);
}

fn header_payload(header: &KaspaHeader) -> Vec<u8> {
    let mut out = Vec::new();
    put_uint(&mut out, u64::from(header.version));

    let mut parents = Vec::new();
    for level in &header.parents {
        let mut level_payload = Vec::new();
        for parent in level {
            put_bytes(&mut level_payload, parent.as_bytes());
        }
        put_list(&mut parents, &level_payload);
    }
    put_list(&mut out, &parents);

    put_bytes(&mut out, header.hash_merkle_root.as_bytes());
    put_bytes(&mut out, header.accepted_id_merkle_root.as_bytes());
    put_bytes(&mut out, header.utxo_commitment.as_bytes());
    put_uint(&mut out, header.timestamp);
    put_uint(&mut out, u64::from(header.bits));
    put_uint(&mut out, header.nonce);
    put_uint(&mut out, header.daa_score);
    put_uint(&mut out, header.blue_score);
    put_biguint(&mut out, &header.blue_work);
    put_bytes(&mut out, header.pruning_point.as_bytes());
    out
}

fn coinbase_payload(tx: &KaspaTransaction) -> Vec<u8> {
    let mut out = Vec::new();
    put_uint(&mut out, u64::from(tx.version));

    let mut inputs = Vec::new();
    for input in &tx.inputs {
        let mut item = Vec::new();
        put_bytes(&mut item, input.previous_outpoint.transaction_id.as_bytes());
        put_uint(&mut item, u64::from(input.previous_outpoint.index));
        put_bytes(&mut item, &input.signature_script);
        put_uint(&mut item, u64::from(input.sig_op_count));
        put_uint(&mut item, input.sequence);
        put_list(&mut inputs, &item);
    }
    put_list(&mut out, &inputs);

    let mut outputs = Vec::new();
    for output in &tx.outputs {
        let mut item = Vec::new();
        put_uint(&mut item, output.value);
        put_uint(&mut item, u64::from(output.script_version));
        put_bytes(&mut item, &output.script_public_key);
        put_list(&mut outputs, &item);
    }
    put_list(&mut out, &outputs);

    put_uint(&mut out, tx.lock_time);
    put_bytes(&mut out, &tx.subnetwork_id);
    put_uint(&mut out, tx.gas);
    put_bytes(&mut out, &tx.payload);
    out
}

/// Encode a Kaspa block for the wire.
pub fn encode_block(block: &KaspaBlock) -> Vec<u8> {
    let mut payload = Vec::new();
    put_list(&mut payload, &header_payload(&block.header));

    let mut branch = Vec::new();
    for sibling in &block.merkle_branch {
        put_bytes(&mut branch, sibling.as_bytes());
    }
    put_list(&mut payload, &branch);

    put_list(&mut payload, &coinbase_payload(&block.coinbase));

    let mut out = Vec::new();
    put_list(&mut out, &payload);
    out
}

// ---------------------------------------------------------------- decoding

/// A cursor over one RLP payload, yielding items in order.
pub struct Walker<'a> {
    buf: &'a [u8],
}

impl<'a> Walker<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn next_payload(&mut self, expect_list: bool, what: &'static str) -> Result<&'a [u8], WireError> {
        let mut buf = self.buf;
        let header = Header::decode(&mut buf)?;
        if header.list != expect_list {
            return Err(WireError::Malformed(what));
        }
        if buf.len() < header.payload_length {
            return Err(WireError::Rlp(alloy_rlp::Error::InputTooShort));
        }
        let payload = &buf[..header.payload_length];
        self.buf = &buf[header.payload_length..];
        Ok(payload)
    }

    pub fn bytes(&mut self, what: &'static str) -> Result<&'a [u8], WireError> {
        self.next_payload(false, what)
    }

    pub fn list(&mut self, what: &'static str) -> Result<Walker<'a>, WireError> {
        Ok(Walker::new(self.next_payload(true, what)?))
    }

    pub fn uint(&mut self, what: &'static str) -> Result<u64, WireError> {
        let bytes = self.bytes(what)?;
        if bytes.len() > 8 || bytes.first() == Some(&0) {
            return Err(WireError::Malformed(what));
        }
        let mut value = 0u64;
        for &byte in bytes {
            value = value << 8 | u64::from(byte);
        }
        Ok(value)
    }

    pub fn u32(&mut self, what: &'static str) -> Result<u32, WireError> {
        u32::try_from(self.uint(what)?).map_err(|_| WireError::Malformed(what))
    }

    pub fn u16(&mut self, what: &'static str) -> Result<u16, WireError> {
        u16::try_from(self.uint(what)?).map_err(|_| WireError::Malformed(what))
    }

    pub fn u8(&mut self, what: &'static str) -> Result<u8, WireError> {
        u8::try_from(self.uint(what)?).map_err(|_| WireError::Malformed(what))
    }

    pub fn biguint(&mut self, what: &'static str) -> Result<BigUint, WireError> {
        let bytes = self.bytes(what)?;
        if bytes.first() == Some(&0) {
            return Err(WireError::Malformed(what));
        }
        Ok(BigUint::from_bytes_be(bytes))
    }

    pub fn hash(&mut self, what: &'static str) -> Result<DomainHash, WireError> {
        let bytes = self.bytes(what)?;
        DomainHash::from_slice(bytes).ok_or(WireError::Malformed(what))
    }

    /// A hash that may be encoded as the empty string (an absent parent),
    /// which decodes to the zero hash.
    pub fn optional_hash(&mut self, what: &'static str) -> Result<DomainHash, WireError> {
        let bytes = self.bytes(what)?;
        if bytes.is_empty() {
            return Ok(DomainHash::default());
        }
        DomainHash::from_slice(bytes).ok_or(WireError::Malformed(what))
    }

    pub fn finish(self, what: &'static str) -> Result<(), WireError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(WireError::Trailing(what))
        }
    }
}

fn decode_header(walker: &mut Walker<'_>) -> Result<KaspaHeader, WireError> {
    let mut fields = walker.list("header")?;

    let version = fields.u16("header version")?;

    let mut parents = Vec::new();
    let mut levels = fields.list("parents")?;
    while !levels.is_empty() {
        let mut level = levels.list("parent level")?;
        let mut hashes = Vec::new();
        while !level.is_empty() {
            hashes.push(level.optional_hash("parent hash")?);
        }
        parents.push(hashes);
    }

    let header = KaspaHeader {
        version,
        parents,
        hash_merkle_root: fields.hash("hash merkle root")?,
        accepted_id_merkle_root: fields.hash("accepted id merkle root")?,
        utxo_commitment: fields.hash("utxo commitment")?,
        timestamp: fields.uint("timestamp")?,
        bits: fields.u32("bits")?,
        nonce: fields.uint("nonce")?,
        daa_score: fields.uint("daa score")?,
        blue_score: fields.uint("blue score")?,
        blue_work: fields.biguint("blue work")?,
        pruning_point: fields.hash("pruning point")?,
    };
    fields.finish("header")?;
    Ok(header)
}

fn decode_coinbase(walker: &mut Walker<'_>) -> Result<KaspaTransaction, WireError> {
    let mut fields = walker.list("coinbase")?;

    let version = fields.u16("coinbase version")?;

    let mut inputs = Vec::new();
    let mut input_items = fields.list("inputs")?;
    while !input_items.is_empty() {
        let mut item = input_items.list("input")?;
        let input = TransactionInput {
            previous_outpoint: Outpoint {
                transaction_id: item.hash("outpoint transaction id")?,
                index: item.u32("outpoint index")?,
            },
            signature_script: item.bytes("signature script")?.to_vec(),
            sig_op_count: item.u8("sig op count")?,
            sequence: item.uint("sequence")?,
        };
        item.finish("input")?;
        inputs.push(input);
    }

    let mut outputs = Vec::new();
    let mut output_items = fields.list("outputs")?;
    while !output_items.is_empty() {
        let mut item = output_items.list("output")?;
        let output = TransactionOutput {
            value: item.uint("output value")?,
            script_version: item.u16("script version")?,
            script_public_key: item.bytes("script public key")?.to_vec(),
        };
        item.finish("output")?;
        outputs.push(output);
    }

    let lock_time = fields.uint("lock time")?;
    let subnetwork_bytes = fields.bytes("subnetwork id")?;
    let subnetwork_id = <[u8; SUBNETWORK_ID_SIZE]>::try_from(subnetwork_bytes)
        .map_err(|_| WireError::Malformed("subnetwork id"))?;
    let gas = fields.uint("gas")?;
    let payload = fields.bytes("payload")?.to_vec();
    fields.finish("coinbase")?;

    Ok(KaspaTransaction {
        version,
        inputs,
        outputs,
        lock_time,
        subnetwork_id,
        gas,
        payload,
    })
}

/// Decode a Kaspa block from the wire.
pub fn decode_block(data: &[u8]) -> Result<KaspaBlock, WireError> {
    let mut outer = Walker::new(data);
    let mut items = outer.list("block")?;
    outer.finish("block")?;

    let header = decode_header(&mut items)?;

    let mut branch = Vec::new();
    let mut siblings = items.list("merkle branch")?;
    while !siblings.is_empty() {
        // Branch siblings must be real hashes; an absent sibling is invalid.
        branch.push(siblings.hash("merkle branch sibling")?);
    }

    let coinbase = decode_coinbase(&mut items)?;
    items.finish("block")?;

    Ok(KaspaBlock {
        header,
        merkle_branch: branch,
        coinbase,
    })
}
