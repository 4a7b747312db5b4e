//! # Wallet Session DTOs
//!
//! Provider keys, validated account addresses, the durable connection record
//! and the read-only session snapshot handed to UI code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::chain::ChainId;

/// Supported browser wallet providers.
///
/// The serialized form is the key stored in the persisted connection record
/// (`"metamask"`, `"okx"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    MetaMask,
    Okx,
    Coinbase,
    Trust,
}

impl ProviderKind {
    pub fn all() -> &'static [ProviderKind] {
        &[
            ProviderKind::MetaMask,
            ProviderKind::Okx,
            ProviderKind::Coinbase,
            ProviderKind::Trust,
        ]
    }

    /// Storage / registry key.
    pub fn key(&self) -> &'static str {
        match self {
            ProviderKind::MetaMask => "metamask",
            ProviderKind::Okx => "okx",
            ProviderKind::Coinbase => "coinbase",
            ProviderKind::Trust => "trust",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::MetaMask => "MetaMask",
            ProviderKind::Okx => "OKX Wallet",
            ProviderKind::Coinbase => "Coinbase Wallet",
            ProviderKind::Trust => "Trust Wallet",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProviderKind {
    type Err = UnknownProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ProviderKind::all()
            .iter()
            .copied()
            .find(|kind| kind.key() == wanted)
            .ok_or(UnknownProviderError(s.to_string()))
    }
}

/// EVM account address, always held in lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Validate `0x` + 40 hex digits and normalise to lowercase.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AddressError(raw.to_string()))?;
        if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressError(raw.to_string()));
        }
        Ok(Address(format!("0x{}", digits.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// Durable record that lets a page reload reconnect silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedConnection {
    pub provider_kind: ProviderKind,
    pub address: Address,
}

/// Read-only view of the wallet session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub provider: Option<ProviderKind>,
    pub address: Option<Address>,
    pub connected: bool,
    pub correct_network: bool,
    pub chain_id: Option<ChainId>,
}

impl SessionSnapshot {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// `0x1234...abcd`, or `None` while disconnected.
    pub fn short_address(&self) -> Option<String> {
        self.address
            .as_ref()
            .map(|address| crate::utils::truncate_address(address.as_str()))
    }
}

// region:    --- Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressError(pub String);

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid address: {:?}", self.0)
    }
}

impl std::error::Error for AddressError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProviderError(pub String);

impl fmt::Display for UnknownProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown wallet provider: {:?}", self.0)
    }
}

impl std::error::Error for UnknownProviderError {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";

    #[test]
    fn test_address_is_lowercased() {
        let address = Address::parse(MIXED).unwrap();
        assert_eq!(address.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!(Address::parse("abcdef0123456789abcdef0123456789abcdef01").is_err());
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0xgggggggggggggggggggggggggggggggggggggggg").is_err());
    }

    #[test]
    fn test_provider_kind_keys() {
        assert_eq!("metamask".parse::<ProviderKind>().unwrap(), ProviderKind::MetaMask);
        assert_eq!("OKX".parse::<ProviderKind>().unwrap(), ProviderKind::Okx);
        assert!("phantom".parse::<ProviderKind>().is_err());
        assert_eq!(
            serde_json::to_string(&ProviderKind::MetaMask).unwrap(),
            "\"metamask\""
        );
    }

    #[test]
    fn test_persisted_connection_wire_format() {
        let record = PersistedConnection {
            provider_kind: ProviderKind::MetaMask,
            address: Address::parse(MIXED).unwrap(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"providerKind":"metamask","address":"0xabcdef0123456789abcdef0123456789abcdef01"}"#
        );
        let back: PersistedConnection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_persisted_connection_rejects_bad_address() {
        let json = r#"{"providerKind":"metamask","address":"not-an-address"}"#;
        assert!(serde_json::from_str::<PersistedConnection>(json).is_err());
    }

    #[test]
    fn test_snapshot_short_address() {
        let snapshot = SessionSnapshot {
            provider: Some(ProviderKind::MetaMask),
            address: Some(Address::parse(MIXED).unwrap()),
            connected: true,
            correct_network: true,
            chain_id: Some(ChainId::ETHEREUM),
        };
        assert_eq!(snapshot.short_address().as_deref(), Some("0xabcd...ef01"));
        assert!(SessionSnapshot::disconnected().short_address().is_none());
    }
}
