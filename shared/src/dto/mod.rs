//! # Data Transfer Objects (DTOs)
//!
//! Plain data shared between the session core and the web front-end.
//!
//! ## Module Organization
//!
//! - [`chain`] - EVM chain ids (`0x1`, `0x89`, ...)
//! - [`wallet`] - Provider keys, addresses, persisted connection, session snapshot
//!
//! ## Serialization Format
//!
//! - **Chain ids**: lowercase `0x` hex strings
//! - **Provider kinds**: lowercase keys (`"metamask"`)
//! - **Persisted connection**: camelCase keys, matching what the browser keeps
//!   in local storage
//!
//! ```text
//! localStorage["blocke.walletConnection"] =
//!   {"providerKind":"metamask","address":"0x5290...9ee7"}
//! ```

pub mod chain;
pub mod wallet;

pub use chain::*;
pub use wallet::*;
