//! The Kaspa cross-mining reward schedule.
//!
//! Rewards follow a piecewise, time-indexed curve: a three-day launch
//! incentive, then a fixed 30-day-month decay table, then a plateau. The
//! Lithium fork rescaled Kaspa's difficulty unit by 512, so a second table
//! set (every entry 512x larger, divisor 512_000) takes over when Lithium is
//! active at the parent block time.
//!
//! The tables are consensus constants. Shipping different values is a hard
//! fork, so they are checksummed against a manifest at engine construction.

use crate::chain_config::ChainConfig;
use crate::crosschain::{ChainTag, ForeignBlock};
use crate::error::{ConsensusError, ConsensusResult};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use num_bigint::BigUint;
use num_traits::Zero;

/// Seconds in a reward-schedule day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Seconds in a reward-schedule month. Fixed 30-day months, not calendar
/// months.
pub const SECONDS_PER_MONTH: u64 = 2_592_000;

/// Days covered by the launch incentive table.
pub const INCENTIVE_DAYS: u64 = 3;

/// Month index at which the schedule plateaus.
pub const PLATEAU_MONTH: u64 = 141;

/// Reward divisor before Lithium: base rewards are wei per 1_000_000 units
/// of foreign difficulty.
const PRE_LITHIUM_DIVISOR: u64 = 1_000_000;

/// Reward divisor after Lithium's 512x difficulty-unit rescale.
const LITHIUM_DIVISOR: u64 = 512_000;

/// Base rewards for the first three days after the fork.
pub const KASPA_INCENTIVE_BASE_REWARDS: [u64; 3] = [600_000, 400_000, 200_000];

/// Per-month base rewards from day three onward.
pub const KASPA_MONTH_BASE_REWARDS: [u64; 142] = [
    183_829, 91_915, 45_958, 25_868, 23_963, 23_254, 22_566, 21_898,
    21_249, 20_620, 20_010, 19_418, 18_843, 18_285, 17_744, 17_219,
    16_709, 16_214, 15_734, 15_269, 14_817, 14_378, 13_953, 13_540,
    13_139, 12_750, 12_372, 12_006, 11_651, 11_306, 10_971, 10_647,
    10_331, 10_026, 9_729, 9_441, 9_161, 8_890, 8_627, 8_372,
    8_124, 7_883, 7_650, 7_424, 7_204, 6_991, 6_784, 6_583,
    6_388, 6_199, 6_016, 5_838, 5_665, 5_497, 5_334, 5_176,
    5_023, 4_875, 4_730, 4_590, 4_454, 4_323, 4_195, 4_070,
    3_950, 3_833, 3_720, 3_610, 3_503, 3_399, 3_298, 3_201,
    3_106, 3_014, 2_925, 2_838, 2_754, 2_673, 2_594, 2_517,
    2_442, 2_370, 2_300, 2_232, 2_166, 2_102, 2_040, 1_979,
    1_921, 1_864, 1_809, 1_755, 1_703, 1_653, 1_604, 1_556,
    1_510, 1_466, 1_422, 1_380, 1_339, 1_300, 1_261, 1_224,
    1_188, 1_153, 1_119, 1_085, 1_053, 1_022, 992, 963,
    934, 906, 880, 854, 828, 804, 780, 757,
    735, 713, 692, 671, 651, 632, 613, 595,
    578, 561, 544, 528, 512, 497, 482, 468,
    454, 441, 428, 415, 403, 400,
];

/// Launch incentive base rewards in the Lithium difficulty unit.
pub const KASPA_INCENTIVE_BASE_REWARDS_LITHIUM: [u64; 3] =
    [307_200_000, 204_800_000, 102_400_000];

/// Per-month base rewards in the Lithium difficulty unit.
pub const KASPA_MONTH_BASE_REWARDS_LITHIUM: [u64; 142] = [
    94_120_448, 47_060_480, 23_530_496, 13_244_416, 12_269_056, 11_906_048,
    11_553_792, 11_211_776, 10_879_488, 10_557_440, 10_245_120, 9_942_016,
    9_647_616, 9_361_920, 9_084_928, 8_816_128, 8_555_008, 8_301_568,
    8_055_808, 7_817_728, 7_586_304, 7_361_536, 7_143_936, 6_932_480,
    6_727_168, 6_528_000, 6_334_464, 6_147_072, 5_965_312, 5_788_672,
    5_617_152, 5_451_264, 5_289_472, 5_133_312, 4_981_248, 4_833_792,
    4_690_432, 4_551_680, 4_417_024, 4_286_464, 4_159_488, 4_036_096,
    3_916_800, 3_801_088, 3_688_448, 3_579_392, 3_473_408, 3_370_496,
    3_270_656, 3_173_888, 3_080_192, 2_989_056, 2_900_480, 2_814_464,
    2_731_008, 2_650_112, 2_571_776, 2_496_000, 2_421_760, 2_350_080,
    2_280_448, 2_213_376, 2_147_840, 2_083_840, 2_022_400, 1_962_496,
    1_904_640, 1_848_320, 1_793_536, 1_740_288, 1_688_576, 1_638_912,
    1_590_272, 1_543_168, 1_497_600, 1_453_056, 1_410_048, 1_368_576,
    1_328_128, 1_288_704, 1_250_304, 1_213_440, 1_177_600, 1_142_784,
    1_108_992, 1_076_224, 1_044_480, 1_013_248, 983_552, 954_368,
    926_208, 898_560, 871_936, 846_336, 821_248, 796_672,
    773_120, 750_592, 728_064, 706_560, 685_568, 665_600,
    645_632, 626_688, 608_256, 590_336, 572_928, 555_520,
    539_136, 523_264, 507_904, 493_056, 478_208, 463_872,
    450_560, 437_248, 423_936, 411_648, 399_360, 387_584,
    376_320, 365_056, 354_304, 343_552, 333_312, 323_584,
    313_856, 304_640, 295_936, 287_232, 278_528, 270_336,
    262_144, 254_464, 246_784, 239_616, 232_448, 225_792,
    219_136, 212_480, 206_336, 204_800,
];

/// BLAKE2b-256 digests of the tables, over 8-byte little-endian entries.
const TABLE_MANIFEST: [(&str, &[u64], &str); 4] = [
    (
        "kaspa_incentive_base_rewards",
        &KASPA_INCENTIVE_BASE_REWARDS,
        "86526d54038d4f8333222b5a31fb18c938f4d7bdcf1d012a1c569e0667004485",
    ),
    (
        "kaspa_incentive_base_rewards_lithium",
        &KASPA_INCENTIVE_BASE_REWARDS_LITHIUM,
        "22b3b66fe2944d5fc7444fe211e55a32fb7278e697959bf3cecba799357afac7",
    ),
    (
        "kaspa_month_base_rewards",
        &KASPA_MONTH_BASE_REWARDS,
        "3762d259f89d30574ce9a98ca05a5858c5209abd90bad2a9b623c14da660c0f6",
    ),
    (
        "kaspa_month_base_rewards_lithium",
        &KASPA_MONTH_BASE_REWARDS_LITHIUM,
        "baa73c705cb39086420666d550ee4b82075be5d5d1c88c11b5aac845e9300178",
    ),
];

/// Verify the reward tables against their manifest.
///
/// Run at engine construction; a mismatch means the build carries corrupted
/// consensus constants and must not come up.
pub fn verify_table_manifest() -> ConsensusResult<()> {
    for (table, values, expected) in TABLE_MANIFEST {
        let mut hasher = Blake2b::<U32>::new();
        for value in values {
            Digest::update(&mut hasher, value.to_le_bytes());
        }
        if hex::encode(hasher.finalize()) != expected {
            return Err(ConsensusError::TableManifestMismatch { table });
        }
    }
    Ok(())
}

/// Whole days and whole 30-day months passed between the fork and `time`.
/// Both are zero when `time` is before the fork.
pub fn time_passed_since_fork(fork_time: u64, time: u64) -> (u64, u64) {
    if time < fork_time {
        return (0, 0);
    }
    let elapsed = time - fork_time;
    (elapsed / SECONDS_PER_DAY, elapsed / SECONDS_PER_MONTH)
}

/// The reward for a foreign block, in wei. Zero before the fork and for
/// chains without a schedule.
pub fn cross_mining_reward(
    block: &ForeignBlock,
    fork_time: u64,
    time: u64,
    lithium: bool,
) -> BigUint {
    if time < fork_time {
        return BigUint::zero();
    }

    match block.chain() {
        ChainTag::Kaspa => kaspa_cross_mining_reward(&block.difficulty(), fork_time, time, lithium),
        _ => BigUint::zero(),
    }
}

/// The Kaspa reward for a given difficulty:
/// `difficulty * base_reward / divisor`, integer division, where the base
/// reward is picked from the day/month schedule for the era's table set.
pub fn kaspa_cross_mining_reward(
    difficulty: &BigUint,
    fork_time: u64,
    time: u64,
    lithium: bool,
) -> BigUint {
    let (day, month) = time_passed_since_fork(fork_time, time);

    let (incentive, months, divisor) = if lithium {
        (
            &KASPA_INCENTIVE_BASE_REWARDS_LITHIUM,
            &KASPA_MONTH_BASE_REWARDS_LITHIUM,
            LITHIUM_DIVISOR,
        )
    } else {
        (
            &KASPA_INCENTIVE_BASE_REWARDS,
            &KASPA_MONTH_BASE_REWARDS,
            PRE_LITHIUM_DIVISOR,
        )
    };

    let base_reward = if day < INCENTIVE_DAYS {
        incentive[day as usize]
    } else if month < PLATEAU_MONTH {
        months[month as usize]
    } else {
        months[PLATEAU_MONTH as usize]
    };

    difficulty * base_reward / divisor
}

/// Convenience wrapper resolving the fork time and Lithium flag from
/// configuration. Returns zero when the chain has no scheduled fork.
pub fn reward_for_config(
    config: &ChainConfig,
    block: &ForeignBlock,
    parent_time: u64,
) -> BigUint {
    match config.cross_mining_fork_time(block.chain()) {
        Some(fork_time) => cross_mining_reward(
            block,
            fork_time,
            parent_time,
            config.is_lithium(parent_time),
        ),
        None => BigUint::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORK: u64 = 1_704_067_200;

    fn difficulty_1e18() -> BigUint {
        BigUint::from(1_000_000_000_000_000_000u64)
    }

    fn wei(text: &str) -> BigUint {
        BigUint::parse_bytes(text.as_bytes(), 10).unwrap()
    }

    #[test]
    fn test_table_manifest() {
        verify_table_manifest().unwrap();
    }

    #[test]
    fn test_lithium_tables_are_512x() {
        for (pre, lith) in KASPA_MONTH_BASE_REWARDS
            .iter()
            .zip(KASPA_MONTH_BASE_REWARDS_LITHIUM.iter())
        {
            assert_eq!(pre * 512, *lith);
        }
        for (pre, lith) in KASPA_INCENTIVE_BASE_REWARDS
            .iter()
            .zip(KASPA_INCENTIVE_BASE_REWARDS_LITHIUM.iter())
        {
            assert_eq!(pre * 512, *lith);
        }
    }

    #[test]
    fn test_month_table_shape() {
        assert_eq!(KASPA_MONTH_BASE_REWARDS.len(), 142);
        assert_eq!(KASPA_MONTH_BASE_REWARDS[0], 183_829);
        assert_eq!(KASPA_MONTH_BASE_REWARDS[141], 400);
        assert_eq!(KASPA_MONTH_BASE_REWARDS_LITHIUM[0], 94_120_448);
        assert_eq!(KASPA_MONTH_BASE_REWARDS_LITHIUM[141], 204_800);
        // The decay never increases.
        for pair in KASPA_MONTH_BASE_REWARDS.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_reward_curve_seed_cases() {
        let d = difficulty_1e18();
        let cases: &[(u64, bool, &str)] = &[
            (1_704_067_300, false, "600000000000000000"),
            (1_704_157_200, false, "400000000000000000"),
            (1_704_240_000, false, "200000000000000000"),
            (1_704_326_400, false, "183829000000000000"),
            (1_713_574_900, false, "25868000000000000"),
            (1_853_974_200, false, "4875000000000000"),
            (1_704_326_400, true, "183829000000000000000"),
        ];
        for (time, lithium, expected) in cases {
            assert_eq!(
                kaspa_cross_mining_reward(&d, FORK, *time, *lithium),
                wei(expected),
                "time={time} lithium={lithium}"
            );
        }
    }

    #[test]
    fn test_reward_day_boundaries() {
        let d = difficulty_1e18();
        // Day 3 and day 4 both price from month 0.
        assert_eq!(
            kaspa_cross_mining_reward(&d, FORK, FORK + 3 * SECONDS_PER_DAY, false),
            kaspa_cross_mining_reward(&d, FORK, FORK + 4 * SECONDS_PER_DAY, false),
        );
        // The last second of day 0 still prices at the day-0 incentive.
        assert_eq!(
            kaspa_cross_mining_reward(&d, FORK, FORK + SECONDS_PER_DAY - 1, false),
            wei("600000000000000000")
        );
    }

    #[test]
    fn test_reward_plateau() {
        let d = difficulty_1e18();
        let plateau = kaspa_cross_mining_reward(
            &d,
            FORK,
            FORK + PLATEAU_MONTH * SECONDS_PER_MONTH,
            false,
        );
        assert_eq!(plateau, wei("400000000000000"));
        // Far beyond the table, the reward stays on the plateau entry.
        assert_eq!(
            kaspa_cross_mining_reward(&d, FORK, FORK + 10_000 * SECONDS_PER_MONTH, false),
            plateau
        );
    }

    #[test]
    fn test_time_passed_since_fork_boundaries() {
        assert_eq!(time_passed_since_fork(FORK, FORK), (0, 0));
        assert_eq!(time_passed_since_fork(FORK, FORK + 86_399), (0, 0));
        assert_eq!(time_passed_since_fork(FORK, FORK + 86_400), (1, 0));
        assert_eq!(time_passed_since_fork(FORK, FORK + 2_592_000), (30, 1));
        assert_eq!(time_passed_since_fork(FORK, FORK + 31_536_000), (366, 12));
        assert_eq!(time_passed_since_fork(FORK, FORK - 7_200), (0, 0));
    }

    #[test]
    fn test_reward_is_zero_before_fork() {
        // The chain-level wrapper zeroes any claim dated before the fork.
        use canxium_kaspa::{DomainHash, KaspaBlock, KaspaHeader, KaspaTransaction};

        let coinbase = KaspaTransaction {
            version: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
            subnetwork_id: [0u8; 20],
            gas: 0,
            payload: b"x".to_vec(),
        };
        let block = ForeignBlock::Kaspa(KaspaBlock {
            header: KaspaHeader {
                version: 1,
                parents: Vec::new(),
                hash_merkle_root: DomainHash::default(),
                accepted_id_merkle_root: DomainHash::default(),
                utxo_commitment: DomainHash::default(),
                timestamp: 1,
                bits: 0x2000_20bd,
                nonce: 1,
                daa_score: 0,
                blue_score: 0,
                blue_work: BigUint::zero(),
                pruning_point: DomainHash::default(),
            },
            merkle_branch: Vec::new(),
            coinbase,
        });
        assert_eq!(
            cross_mining_reward(&block, FORK, FORK - 1, false),
            BigUint::zero()
        );
        // At the fork itself the schedule starts at day 0; the fixture bits
        // decode to a difficulty of exactly 1000.
        assert_eq!(
            cross_mining_reward(&block, FORK, FORK, false),
            BigUint::from(600u32)
        );
    }
}
