// Field elements are the only value type the simulator understands:
// calldata, addresses, class hashes and storage slots are all felts.

use crate::error::{HarnessError, Result};
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// P = 2^251 + 17 * 2^192 + 1
pub static FIELD_PRIME: Lazy<BigUint> = Lazy::new(|| {
    (BigUint::from(1u8) << 251usize) + (BigUint::from(17u8) << 192usize) + BigUint::from(1u8)
});

// Digests are truncated to 251 bits, which always lands below the prime
static DIGEST_MASK: Lazy<BigUint> = Lazy::new(|| (BigUint::from(1u8) << 251usize) - 1u8);

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Felt(BigUint);

impl Felt {
    pub fn zero() -> Felt {
        Felt(BigUint::default())
    }

    /// Wrap a value, rejecting anything outside the field
    pub fn new(value: BigUint) -> Result<Felt> {
        if value >= *FIELD_PRIME {
            return Err(HarnessError::InvalidFelt(format!(
                "0x{value:x} is not below the field prime"
            )));
        }
        Ok(Felt(value))
    }

    /// Parse `0x`-prefixed hex or plain decimal
    pub fn parse(text: &str) -> Result<Felt> {
        let trimmed = text.trim();
        let (digits, radix) = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => (hex, 16),
            None => (trimmed, 10),
        };
        let value = BigUint::parse_bytes(digits.as_bytes(), radix)
            .ok_or_else(|| HarnessError::InvalidFelt(text.to_string()))?;
        Felt::new(value)
    }

    /// Reduce a hash digest into the field by keeping its low 251 bits
    pub fn from_digest(digest: &[u8]) -> Felt {
        Felt(BigUint::from_bytes_be(digest) & &*DIGEST_MASK)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::default()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }

    /// Big-endian bytes, left-padded to 32
    pub fn to_bytes_be(&self) -> [u8; 32] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        Felt(BigUint::from(value))
    }
}

impl FromStr for Felt {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        Felt::parse(s)
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl Serialize for Felt {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Felt::parse(&text).map_err(serde::de::Error::custom)
    }
}
