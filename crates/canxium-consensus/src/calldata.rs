//! Mining-contract calldata and the direct-call guard.
//!
//! The cross-mining contract method records the foreign block timestamp on
//! chain and trusts its caller, so the calldata a miner submits must be a
//! byte-for-byte match of what the verifier synthesizes, and the method must
//! never be reachable from a plain transaction.

use crate::chain_config::ChainConfig;
use crate::crosschain::ChainTag;
use crate::transaction::CROSS_MINING_TX_TYPE;
use canxium_kaspa::Address;

/// Selector of `crossMining(address,uint16,uint256)`.
pub const CROSS_MINING_SELECTOR: [u8; 4] = [0x97, 0xb8, 0xf2, 0xfc];

/// Selector of the earlier `mergeMining(address,uint16,uint256)` method,
/// kept for replaying historical eras.
pub const MERGE_MINING_SELECTOR: [u8; 4] = [0x29, 0x79, 0xee, 0x24];

/// Selector plus three 32-byte big-endian words.
pub const CALLDATA_LEN: usize = 4 + 3 * 32;

/// Synthesize the calldata of a cross-mining claim: the method selector,
/// then the miner address, the chain tag and the foreign block timestamp in
/// milliseconds, each left-padded to 32 bytes.
///
/// The miner address is the one extracted from the foreign coinbase payload,
/// not the transaction sender.
pub fn build_cross_mining_calldata(
    chain: ChainTag,
    miner: &Address,
    timestamp_ms: u64,
) -> Vec<u8> {
    let mut data = Vec::with_capacity(CALLDATA_LEN);
    data.extend_from_slice(&CROSS_MINING_SELECTOR);

    let mut word = [0u8; 32];
    word[12..].copy_from_slice(miner.as_bytes());
    data.extend_from_slice(&word);

    let mut word = [0u8; 32];
    word[30..].copy_from_slice(&chain.as_u16().to_be_bytes());
    data.extend_from_slice(&word);

    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&timestamp_ms.to_be_bytes());
    data.extend_from_slice(&word);

    data
}

/// Whether a transaction is a plain transaction invoking the cross-mining
/// contract method. The method stores the foreign timestamp it is given, so
/// only cross-mining transactions, whose calldata the verifier has checked,
/// may reach it.
pub fn is_unauthorized_cross_mining_call(
    config: &ChainConfig,
    tx_type: u8,
    to: Option<&Address>,
    data: &[u8],
) -> bool {
    if to != Some(&config.mining_contract) {
        return false;
    }
    data.len() >= 4 && data[..4] == CROSS_MINING_SELECTOR && tx_type != CROSS_MINING_TX_TYPE
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINER_HEX: &str = "c0ffee254729296a45a3885639ac7e10f9d54979";

    #[test]
    fn test_calldata_layout() {
        let miner = Address::from_hex(MINER_HEX).unwrap();
        let data = build_cross_mining_calldata(ChainTag::Kaspa, &miner, 1_704_067_305_000);

        assert_eq!(data.len(), CALLDATA_LEN);
        assert_eq!(&data[..4], &CROSS_MINING_SELECTOR);
        // Word 1: miner address, left-padded.
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(&data[16..36], miner.as_bytes());
        // Word 2: chain tag.
        assert_eq!(&data[36..67], &[0u8; 31]);
        assert_eq!(data[67], 1);
        // Word 3: timestamp in milliseconds, big-endian.
        assert_eq!(&data[68..92], &[0u8; 24]);
        assert_eq!(&data[92..100], &1_704_067_305_000u64.to_be_bytes());
    }

    #[test]
    fn test_calldata_is_deterministic() {
        let miner = Address::from_hex(MINER_HEX).unwrap();
        let a = build_cross_mining_calldata(ChainTag::Kaspa, &miner, 12345);
        let b = build_cross_mining_calldata(ChainTag::Kaspa, &miner, 12345);
        assert_eq!(a, b);

        // Any input change shows in the output.
        assert_ne!(
            a,
            build_cross_mining_calldata(ChainTag::Kaspa, &miner, 12346)
        );
        assert_ne!(
            a,
            build_cross_mining_calldata(ChainTag::Kaspa, &Address::new([1; 20]), 12345)
        );
    }

    #[test]
    fn test_selectors() {
        assert_eq!(u32::from_be_bytes(CROSS_MINING_SELECTOR), 0x97b8_f2fc);
        assert_eq!(u32::from_be_bytes(MERGE_MINING_SELECTOR), 0x2979_ee24);
    }

    #[test]
    fn test_guard_trips_on_plain_tx_to_contract() {
        let config = ChainConfig::mainnet();
        let contract = config.mining_contract;
        let mut data = CROSS_MINING_SELECTOR.to_vec();
        data.extend_from_slice(&[0u8; 96]);

        // Plain dynamic-fee transaction targeting the method: rejected.
        assert!(is_unauthorized_cross_mining_call(
            &config,
            0x02,
            Some(&contract),
            &data
        ));

        // The cross-mining type itself is allowed.
        assert!(!is_unauthorized_cross_mining_call(
            &config,
            CROSS_MINING_TX_TYPE,
            Some(&contract),
            &data
        ));
    }

    #[test]
    fn test_guard_ignores_other_receivers_and_methods() {
        let config = ChainConfig::mainnet();
        let contract = config.mining_contract;
        let mut data = CROSS_MINING_SELECTOR.to_vec();
        data.extend_from_slice(&[0u8; 96]);

        // Different receiver.
        assert!(!is_unauthorized_cross_mining_call(
            &config,
            0x02,
            Some(&Address::new([9; 20])),
            &data
        ));
        // Contract creation.
        assert!(!is_unauthorized_cross_mining_call(&config, 0x02, None, &data));
        // Different method.
        let mut merge = MERGE_MINING_SELECTOR.to_vec();
        merge.extend_from_slice(&[0u8; 96]);
        assert!(!is_unauthorized_cross_mining_call(
            &config,
            0x02,
            Some(&contract),
            &merge
        ));
        // Too short to carry a selector.
        assert!(!is_unauthorized_cross_mining_call(
            &config,
            0x02,
            Some(&contract),
            &[0x97, 0xb8]
        ));
    }
}
