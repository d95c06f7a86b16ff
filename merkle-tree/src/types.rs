use std::{fmt, str::FromStr};

use gpro_allowlist_merkle_verify::{ADDRESS_LEN, WORD_LEN};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{MerkleTreeError, Result};

fn strip_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// 20-byte wallet address of a claimant.
#[derive(Debug, Default, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    pub fn to_bytes(&self) -> [u8; ADDRESS_LEN] {
        self.0
    }
}

impl FromStr for Address {
    type Err = MerkleTreeError;

    fn from_str(s: &str) -> Result<Self> {
        let cleaned = strip_hex_prefix(s);
        if cleaned.len() != 2 * ADDRESS_LEN {
            return Err(MerkleTreeError::EncodingError(format!(
                "address {s:?} must be {} hex chars, got {}",
                2 * ADDRESS_LEN,
                cleaned.len()
            )));
        }
        let mut out = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(cleaned, &mut out)
            .map_err(|e| MerkleTreeError::EncodingError(format!("address {s:?}: {e}")))?;
        Ok(Self(out))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// 32-byte big-endian value. Used for the numeric claim fields and for every
/// hash in the tree.
#[derive(Debug, Default, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Bytes32(pub [u8; WORD_LEN]);

impl Bytes32 {
    pub fn to_bytes(&self) -> [u8; WORD_LEN] {
        self.0
    }
}

impl From<[u8; WORD_LEN]> for Bytes32 {
    fn from(bytes: [u8; WORD_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<u64> for Bytes32 {
    fn from(value: u64) -> Self {
        let mut out = [0u8; WORD_LEN];
        out[WORD_LEN - 8..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }
}

impl From<u128> for Bytes32 {
    fn from(value: u128) -> Self {
        let mut out = [0u8; WORD_LEN];
        out[WORD_LEN - 16..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }
}

impl FromStr for Bytes32 {
    type Err = MerkleTreeError;

    /// Accepts up to 64 hex chars, left-padding shorter values with zeros.
    fn from_str(s: &str) -> Result<Self> {
        let cleaned = strip_hex_prefix(s);
        if cleaned.is_empty() {
            return Err(MerkleTreeError::EncodingError(format!(
                "empty 32-byte field {s:?}"
            )));
        }
        if cleaned.len() > 2 * WORD_LEN {
            return Err(MerkleTreeError::EncodingError(format!(
                "value {s:?} overflows 32 bytes ({} hex chars)",
                cleaned.len()
            )));
        }
        let padded = format!("{cleaned:0>width$}", width = 2 * WORD_LEN);
        let mut out = [0u8; WORD_LEN];
        hex::decode_to_slice(padded, &mut out)
            .map_err(|e| MerkleTreeError::EncodingError(format!("value {s:?}: {e}")))?;
        Ok(Self(out))
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

macro_rules! hex_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

hex_serde!(Address);
hex_serde!(Bytes32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_mixed_case() {
        let with_prefix: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        let without: Address = "f39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap();
        assert_eq!(with_prefix, without);
        assert_eq!(
            with_prefix.to_string(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_parse_address_wrong_width() {
        for bad in [
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb9226",
            "f39Fd6e51aad88F6F4ce6aB8827279cffFb9226600",
            "",
        ] {
            assert!(matches!(
                bad.parse::<Address>(),
                Err(MerkleTreeError::EncodingError(_))
            ));
        }
    }

    #[test]
    fn test_parse_address_not_hex() {
        assert!(matches!(
            "zz9Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>(),
            Err(MerkleTreeError::EncodingError(_))
        ));
    }

    #[test]
    fn test_bytes32_left_pads() {
        let short: Bytes32 = "3".parse().unwrap();
        let full: Bytes32 = "0000000000000000000000000000000000000000000000000000000000000003"
            .parse()
            .unwrap();
        assert_eq!(short, full);
        assert_eq!(short, Bytes32::from(3u64));
        assert_eq!("0x0100".parse::<Bytes32>().unwrap(), Bytes32::from(256u128));
    }

    #[test]
    fn test_bytes32_overflow() {
        let too_long = format!("1{}", "0".repeat(64));
        assert!(matches!(
            too_long.parse::<Bytes32>(),
            Err(MerkleTreeError::EncodingError(_))
        ));
        assert!(matches!(
            "0x".parse::<Bytes32>(),
            Err(MerkleTreeError::EncodingError(_))
        ));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let value = Bytes32::from(1u64);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(
            json,
            "\"0x0000000000000000000000000000000000000000000000000000000000000001\""
        );
        let back: Bytes32 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);

        assert!(serde_json::from_str::<Address>("\"0x1234\"").is_err());
    }
}
