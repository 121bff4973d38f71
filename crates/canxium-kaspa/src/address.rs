//! 20-byte Canxium account address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Size of an address in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Errors parsing an address from hex.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// The hex string does not describe exactly 20 bytes.
    #[error("address must be {} hex characters, got {0}", ADDRESS_SIZE * 2)]
    InvalidLength(usize),

    /// The string contains non-hex characters.
    #[error("address is not valid hex")]
    InvalidHex,
}

/// A Canxium account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Wrap raw bytes as an address.
    pub const fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build an address from a slice, if it has exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; ADDRESS_SIZE]>::try_from(bytes).ok().map(Self)
    }

    /// Parse an address from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, AddressParseError> {
        let stripped = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if stripped.len() != ADDRESS_SIZE * 2 {
            return Err(AddressParseError::InvalidLength(stripped.len()));
        }
        let mut bytes = [0u8; ADDRESS_SIZE];
        hex::decode_to_slice(stripped, &mut bytes).map_err(|_| AddressParseError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// The raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Whether this is the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_SIZE]
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_accepts_prefix() {
        let plain = Address::from_hex("c0ffee254729296a45a3885639ac7e10f9d54979").unwrap();
        let prefixed = Address::from_hex("0xc0ffee254729296a45a3885639ac7e10f9d54979").unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(
            plain.to_string(),
            "0xc0ffee254729296a45a3885639ac7e10f9d54979"
        );
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert_eq!(
            Address::from_hex("abcd"),
            Err(AddressParseError::InvalidLength(4))
        );
        assert_eq!(
            Address::from_hex("zz".repeat(20).as_str()),
            Err(AddressParseError::InvalidHex)
        );
    }

    #[test]
    fn test_zero_address() {
        assert!(Address::default().is_zero());
        assert!(!Address::new([1u8; 20]).is_zero());
    }
}
