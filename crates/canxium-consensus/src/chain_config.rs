//! Chain configuration consumed by the cross-mining verifier.
//!
//! Fork activation times are Unix-epoch seconds and their predicates are
//! evaluated against the parent block time, as the host engine supplies it.
//! Networks other than mainnet load a [`ChainConfigFile`] whose fields are
//! all optional, so partial configs fail with an error naming the missing
//! field.

use crate::crosschain::ChainTag;
use canxium_kaspa::{max_target, Address};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Network parameters the verifier depends on.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Helium fork activation time; Kaspa cross mining activates here.
    /// `None` means never.
    pub helium_time: Option<u64>,
    /// Lithium fork activation time; rescales the Kaspa reward tables and
    /// adds the PoW-hash admission bound. `None` means never.
    pub lithium_time: Option<u64>,
    /// Address of the on-chain mining contract.
    pub mining_contract: Address,
    /// Minimum acceptable Kaspa block difficulty.
    pub min_kaspa_difficulty: BigUint,
}

impl ChainConfig {
    /// Mainnet parameters.
    pub fn mainnet() -> Self {
        Self {
            helium_time: Some(1_704_067_200),
            lithium_time: Some(1_735_689_600),
            mining_contract: Address::from_hex("0x2f99e1aff6db377dcbbd27b21c9f4cb14fcda361")
                .expect("valid mainnet contract address"),
            min_kaspa_difficulty: BigUint::from(1_000_000u64),
        }
    }

    /// Whether the Helium fork is active at `time`.
    pub fn is_helium(&self, time: u64) -> bool {
        self.helium_time.map(|fork| time >= fork).unwrap_or(false)
    }

    /// Whether the Lithium fork is active at `time`.
    pub fn is_lithium(&self, time: u64) -> bool {
        self.lithium_time.map(|fork| time >= fork).unwrap_or(false)
    }

    /// The fork time, in seconds, from which a foreign chain's blocks are
    /// accepted. `None` for chains with no activation scheduled.
    pub fn cross_mining_fork_time(&self, chain: ChainTag) -> Option<u64> {
        match chain {
            ChainTag::Kaspa => self.helium_time,
            _ => None,
        }
    }

    /// The minimum difficulty accepted for a foreign chain. Chains without
    /// a configured minimum get the unreachable chain maximum.
    pub fn min_difficulty(&self, chain: ChainTag) -> BigUint {
        match chain {
            ChainTag::Kaspa => self.min_kaspa_difficulty.clone(),
            _ => max_target(),
        }
    }
}

/// Error when constructing a [`ChainConfig`] from a file.
#[derive(Debug, Clone)]
pub struct ChainConfigError {
    /// The field that is missing or invalid.
    pub field: &'static str,
    /// Description of the problem.
    pub message: String,
}

impl fmt::Display for ChainConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain config error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ChainConfigError {}

/// On-disk chain configuration, all fields optional so that partial configs
/// validate with clear errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainConfigFile {
    /// Helium fork activation time in seconds. Absent means never.
    pub helium_time: Option<u64>,
    /// Lithium fork activation time in seconds. Absent means never.
    pub lithium_time: Option<u64>,
    /// Mining contract address as hex.
    pub mining_contract: Option<String>,
    /// Minimum Kaspa difficulty as a decimal string.
    pub min_kaspa_difficulty: Option<String>,
}

impl ChainConfig {
    /// Build a configuration from a file, validating every required field.
    pub fn from_file(file: &ChainConfigFile) -> Result<Self, ChainConfigError> {
        let contract = file
            .mining_contract
            .as_ref()
            .ok_or_else(|| ChainConfigError {
                field: "mining_contract",
                message: "required field missing".to_string(),
            })?;
        let mining_contract =
            Address::from_hex(contract.trim()).map_err(|err| ChainConfigError {
                field: "mining_contract",
                message: err.to_string(),
            })?;

        let min_text = file
            .min_kaspa_difficulty
            .as_ref()
            .ok_or_else(|| ChainConfigError {
                field: "min_kaspa_difficulty",
                message: "required field missing".to_string(),
            })?;
        let min_kaspa_difficulty =
            BigUint::parse_bytes(min_text.trim().as_bytes(), 10).ok_or_else(|| {
                ChainConfigError {
                    field: "min_kaspa_difficulty",
                    message: format!("invalid decimal string: '{min_text}'"),
                }
            })?;
        if min_kaspa_difficulty.is_zero() {
            return Err(ChainConfigError {
                field: "min_kaspa_difficulty",
                message: "minimum difficulty cannot be zero".to_string(),
            });
        }

        Ok(Self {
            helium_time: file.helium_time,
            lithium_time: file.lithium_time,
            mining_contract,
            min_kaspa_difficulty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_file() -> ChainConfigFile {
        ChainConfigFile {
            helium_time: Some(1_704_067_200),
            lithium_time: Some(1_735_689_600),
            mining_contract: Some("0x2f99e1aff6db377dcbbd27b21c9f4cb14fcda361".to_string()),
            min_kaspa_difficulty: Some("1000000".to_string()),
        }
    }

    #[test]
    fn test_mainnet_params() {
        let config = ChainConfig::mainnet();
        assert_eq!(config.helium_time, Some(1_704_067_200));
        assert_eq!(config.lithium_time, Some(1_735_689_600));
        assert_eq!(config.min_kaspa_difficulty, BigUint::from(1_000_000u64));
    }

    #[test]
    fn test_fork_predicates() {
        let config = ChainConfig::mainnet();
        assert!(!config.is_helium(1_704_067_199));
        assert!(config.is_helium(1_704_067_200));
        assert!(config.is_helium(1_704_067_201));

        assert!(!config.is_lithium(1_735_689_599));
        assert!(config.is_lithium(1_735_689_600));
    }

    #[test]
    fn test_none_means_never_active() {
        let mut config = ChainConfig::mainnet();
        config.helium_time = None;
        config.lithium_time = None;
        assert!(!config.is_helium(u64::MAX));
        assert!(!config.is_lithium(u64::MAX));
        assert_eq!(config.cross_mining_fork_time(ChainTag::Kaspa), None);
    }

    #[test]
    fn test_min_difficulty_per_chain() {
        let config = ChainConfig::mainnet();
        assert_eq!(
            config.min_difficulty(ChainTag::Kaspa),
            BigUint::from(1_000_000u64)
        );
        // Chains without a configured minimum are effectively disabled.
        assert_eq!(config.min_difficulty(ChainTag::Monero), max_target());
    }

    #[test]
    fn test_from_file_full() {
        let config = ChainConfig::from_file(&full_file()).unwrap();
        assert_eq!(config.helium_time, Some(1_704_067_200));
        assert_eq!(config.min_kaspa_difficulty, BigUint::from(1_000_000u64));
    }

    #[test]
    fn test_from_file_errors_name_fields() {
        let mut file = full_file();
        file.mining_contract = None;
        let err = ChainConfig::from_file(&file).unwrap_err();
        assert_eq!(err.field, "mining_contract");

        let mut file = full_file();
        file.min_kaspa_difficulty = None;
        let err = ChainConfig::from_file(&file).unwrap_err();
        assert_eq!(err.field, "min_kaspa_difficulty");

        let mut file = full_file();
        file.min_kaspa_difficulty = Some("not-a-number".to_string());
        let err = ChainConfig::from_file(&file).unwrap_err();
        assert!(err.message.contains("invalid decimal"));

        let mut file = full_file();
        file.min_kaspa_difficulty = Some("0".to_string());
        let err = ChainConfig::from_file(&file).unwrap_err();
        assert!(err.message.contains("zero"));
    }

    #[test]
    fn test_from_file_fork_times_optional() {
        let mut file = full_file();
        file.helium_time = None;
        file.lithium_time = None;
        let config = ChainConfig::from_file(&file).unwrap();
        assert!(!config.is_helium(u64::MAX));
        assert!(!config.is_lithium(u64::MAX));
    }
}
