//! Mined Kaspa test fixtures.
//!
//! The nonces below are real kHeavyHash solutions, mined offline against
//! low-difficulty targets with a reference implementation of the Kaspa
//! hashing stack. Any change to a header field invalidates its nonce.

use canxium_consensus::{
    build_cross_mining_calldata, reward, ChainConfig, CrossMiningTx, ForeignBlock, HostHeader,
};
use canxium_kaspa::{
    Address, DomainHash, KaspaBlock, KaspaHeader, KaspaTransaction, Outpoint, TransactionInput,
    TransactionOutput, MINER_TAG_PREFIX,
};
use num_bigint::BigUint;

/// Helium fork time used by every fixture.
pub const FORK_TIME: u64 = 1_704_067_200;

/// Compact bits decoding to a difficulty of exactly 1000.
pub const FIXTURE_BITS: u32 = 0x2000_20bd;

/// Foreign block timestamp: 105 seconds past the fork, in milliseconds.
pub const FIXTURE_TIMESTAMP_MS: u64 = (FORK_TIME + 105) * 1000;

/// A parent block 100 seconds past the fork (day 0).
pub const PARENT_TIME: u64 = FORK_TIME + 100;

/// Mined nonce of [`mined_block_a`].
pub const BLOCK_A_NONCE: u64 = 7279;

/// Mined nonce of [`mined_block_b`].
pub const BLOCK_B_NONCE: u64 = 1626;

/// Mined nonce of [`high_pow_block`].
pub const BLOCK_C_NONCE: u64 = 2;

/// The Canxium miner tagged in the fixture coinbase payloads.
pub const MINER_HEX: &str = "c0ffee254729296a45a3885639ac7e10f9d54979";

/// The fixture miner as an address.
pub fn miner() -> Address {
    Address::from_hex(MINER_HEX).expect("fixture miner address")
}

/// The coinbase carried by every fixture block: one all-zero-outpoint
/// input, one payment output, and a payload ending in the miner tag.
pub fn fixture_coinbase() -> KaspaTransaction {
    let mut payload = vec![0xaa, 0xbb, 0xcc];
    payload.extend_from_slice(b"/kaspa-pool/");
    payload.extend_from_slice(MINER_TAG_PREFIX);
    payload.extend_from_slice(MINER_HEX.as_bytes());

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
            script_public_key: [&[0x20u8][..], &[0xaa; 32][..], &[0xac][..]].concat(),
        }],
        lock_time: 0,
        subnetwork_id,
        gas: 0,
        payload,
    }
}

fn fixture_header(
    parents: Vec<Vec<DomainHash>>,
    hash_merkle_root: DomainHash,
    bits: u32,
    nonce: u64,
) -> KaspaHeader {
    KaspaHeader {
        version: 1,
        parents,
        hash_merkle_root,
        accepted_id_merkle_root: DomainHash::new([0x21; 32]),
        utxo_commitment: DomainHash::new([0x22; 32]),
        timestamp: FIXTURE_TIMESTAMP_MS,
        bits,
        nonce,
        daa_score: 1111,
        blue_score: 2222,
        blue_work: BigUint::from(0x1234_abcdu64),
        pruning_point: DomainHash::new([0x23; 32]),
    }
}

/// A mined block whose coinbase hash is itself the Merkle root (empty
/// branch), at difficulty 1000.
pub fn mined_block_a() -> KaspaBlock {
    let coinbase = fixture_coinbase();
    KaspaBlock {
        header: fixture_header(
            vec![
                vec![DomainHash::new([0x10; 32]), DomainHash::new([0x11; 32])],
                vec![DomainHash::new([0x12; 32])],
            ],
            coinbase.hash(),
            FIXTURE_BITS,
            BLOCK_A_NONCE,
        ),
        merkle_branch: Vec::new(),
        coinbase,
    }
}

/// A mined block with a one-sibling Merkle branch, at difficulty 1000.
pub fn mined_block_b() -> KaspaBlock {
    let coinbase = fixture_coinbase();
    let sibling = DomainHash::new([0x42; 32]);
    let root = canxium_kaspa::merkle_branch_hash(&coinbase.hash(), &sibling);
    KaspaBlock {
        header: fixture_header(
            vec![vec![DomainHash::new([0x10; 32])]],
            root,
            FIXTURE_BITS,
            BLOCK_B_NONCE,
        ),
        merkle_branch: vec![sibling],
        coinbase,
    }
}

/// A mined block at difficulty 1 whose PoW value meets its target but lies
/// above the post-Lithium admission bound of `2^247`.
pub fn high_pow_block() -> KaspaBlock {
    let coinbase = fixture_coinbase();
    KaspaBlock {
        header: fixture_header(
            vec![vec![DomainHash::new([0x10; 32])]],
            coinbase.hash(),
            0x207f_ffff,
            BLOCK_C_NONCE,
        ),
        merkle_branch: Vec::new(),
        coinbase,
    }
}

/// A configuration accepting the fixture blocks: Helium at the fixture
/// fork, no Lithium, minimum Kaspa difficulty 1000.
pub fn test_config() -> ChainConfig {
    ChainConfig {
        helium_time: Some(FORK_TIME),
        lithium_time: None,
        mining_contract: Address::from_hex("0x2f99e1aff6db377dcbbd27b21c9f4cb14fcda361")
            .expect("fixture contract address"),
        min_kaspa_difficulty: BigUint::from(1000u32),
    }
}

/// The standard parent header for the fixtures.
pub fn parent_header() -> HostHeader {
    HostHeader {
        number: 4_200_000,
        time: PARENT_TIME,
    }
}

/// A well-formed cross-mining transaction claiming `block`'s reward against
/// `config` at `parent_time`: correct receiver, value and calldata.
pub fn cross_mining_tx_for(
    config: &ChainConfig,
    block: KaspaBlock,
    parent_time: u64,
) -> CrossMiningTx {
    let foreign = ForeignBlock::Kaspa(block);
    let value = reward::reward_for_config(config, &foreign, parent_time);
    let miner = foreign.miner_address().expect("fixture blocks carry a miner tag");
    let data = build_cross_mining_calldata(foreign.chain(), &miner, foreign.timestamp());

    CrossMiningTx {
        chain_id: BigUint::from(3003u32),
        nonce: 1,
        gas_tip_cap: BigUint::from(1_000_000_000u64),
        gas_fee_cap: BigUint::from(2_000_000_000u64),
        gas: 400_000,
        from: miner,
        to: config.mining_contract,
        value,
        data,
        aux_pow: Some(foreign),
        v: BigUint::from(1u32),
        r: BigUint::from(2u32),
        s: BigUint::from(3u32),
    }
}
