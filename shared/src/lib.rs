//! # Shared Wallet Types
//!
//! Types shared by the session core (`lib-core`) and the browser front-end
//! (`wallet-web`).
//!
//! ## Structure
//!
//! - **[`dto`]**: Data types for the wallet session
//!   - **[`dto::chain`]**: `ChainId` parsed from and rendered as `0x` hex
//!   - **[`dto::wallet`]**: `ProviderKind`, `Address`, `PersistedConnection`, `SessionSnapshot`
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format wallet addresses for display
//!   - **[`utils::truncate_address`]**: `0x1234...abcd` form
//!
//! ## Usage
//!
//! ```rust
//! use shared::{Address, ChainId, PersistedConnection, ProviderKind};
//!
//! let record = PersistedConnection {
//!     provider_kind: ProviderKind::MetaMask,
//!     address: Address::parse("0x52908400098527886E0F7030069857D2E4169EE7").unwrap(),
//! };
//! assert_eq!(record.address.as_str(), "0x52908400098527886e0f7030069857d2e4169ee7");
//! assert_eq!(ChainId::from_hex("0x89").unwrap(), ChainId::POLYGON);
//! ```

pub mod dto;
pub mod utils;

// Wildcard re-exports: everything in this crate is public API
pub use dto::*;
pub use utils::*;
