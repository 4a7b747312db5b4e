//! # Chain Identifiers
//!
//! EVM chain ids as reported by `eth_chainId` and accepted by
//! `wallet_switchEthereumChain`. Wallets speak `0x`-prefixed hex; this type
//! keeps the numeric value and renders it back as lowercase hex.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// EVM chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const ETHEREUM: ChainId = ChainId(0x1);
    pub const SEPOLIA: ChainId = ChainId(0xaa36a7);
    pub const POLYGON: ChainId = ChainId(0x89);
    pub const BSC: ChainId = ChainId(0x38);
    pub const ARBITRUM: ChainId = ChainId(0xa4b1);
    pub const BASE: ChainId = ChainId(0x2105);

    /// Parse a `0x`-prefixed hex quantity (`"0x89"`).
    ///
    /// Some wallets still report decimal strings on `chainChanged`, so a bare
    /// decimal number is accepted too.
    pub fn from_hex(value: &str) -> Result<Self, ParseChainIdError> {
        let trimmed = value.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(digits) if !digits.is_empty() => u64::from_str_radix(digits, 16),
            Some(_) => return Err(ParseChainIdError(value.to_string())),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(ChainId)
            .map_err(|_| ParseChainIdError(value.to_string()))
    }

    /// Lowercase `0x` hex form, as wallets expect it.
    pub fn to_hex(&self) -> String {
        format!("{:#x}", self.0)
    }

    /// Human readable network name for the chains the dashboard knows about.
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            ChainId::ETHEREUM => Some("Ethereum"),
            ChainId::SEPOLIA => Some("Sepolia"),
            ChainId::POLYGON => Some("Polygon"),
            ChainId::BSC => Some("BNB Smart Chain"),
            ChainId::ARBITRUM => Some("Arbitrum One"),
            ChainId::BASE => Some("Base"),
            _ => None,
        }
    }

    /// Name if known, hex otherwise.
    pub fn label(&self) -> String {
        self.name()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_hex())
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = ParseChainIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChainId::from_hex(s)
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ChainId::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

// region:    --- Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChainIdError(pub String);

impl fmt::Display for ParseChainIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid chain id: {:?}", self.0)
    }
}

impl std::error::Error for ParseChainIdError {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_chain_ids() {
        assert_eq!(ChainId::from_hex("0x1").unwrap(), ChainId::ETHEREUM);
        assert_eq!(ChainId::from_hex("0x89").unwrap(), ChainId::POLYGON);
        assert_eq!(ChainId::from_hex("0xAA36A7").unwrap(), ChainId::SEPOLIA);
        assert_eq!(ChainId::from_hex("137").unwrap(), ChainId::POLYGON);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ChainId::from_hex("0x").is_err());
        assert!(ChainId::from_hex("polygon").is_err());
        assert!(ChainId::from_hex("0xzz").is_err());
    }

    #[test]
    fn test_hex_rendering() {
        assert_eq!(ChainId::POLYGON.to_hex(), "0x89");
        assert_eq!(ChainId::SEPOLIA.to_string(), "0xaa36a7");
        assert_eq!(ChainId(0xdead).label(), "0xdead");
        assert_eq!(ChainId::ETHEREUM.label(), "Ethereum");
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let json = serde_json::to_string(&ChainId::POLYGON).unwrap();
        assert_eq!(json, "\"0x89\"");
        let back: ChainId = serde_json::from_str("\"0x1\"").unwrap();
        assert_eq!(back, ChainId::ETHEREUM);
    }
}
