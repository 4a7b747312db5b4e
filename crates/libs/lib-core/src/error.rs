//! # Centralized Error Handling
//!
//! This module defines [`WalletError`], the error type returned by every
//! fallible session operation. It follows the `thiserror` pattern used across
//! the workspace.
//!
//! ## Error Categories
//!
//! 1. **User-rejected actions** - the wallet prompt was dismissed (EIP-1193 code `4001`)
//!    - [`UserRejected`](WalletError::UserRejected) → dismissible "Transaction Rejected" overlay
//!
//! 2. **Provider / network failures** - something the caller may retry
//!    - [`ProviderNotFound`](WalletError::ProviderNotFound)
//!    - [`UnknownChain`](WalletError::UnknownChain) (code `4902`)
//!    - [`SwitchFailed`](WalletError::SwitchFailed)
//!    - [`Provider`](WalletError::Provider)
//!    - [`NoAccounts`](WalletError::NoAccounts)
//!
//! 3. **Validation failures** - caught before any wallet call
//!    - [`Validation`](WalletError::Validation)
//!    - [`NotConnected`](WalletError::NotConnected)
//!
//! 4. **Superseded** - a newer connect or a disconnect overtook the attempt
//!    - [`Superseded`](WalletError::Superseded) → not shown to the user
//!
//! 5. **Unexpected** - logged and shown as a generic failure
//!    - [`Storage`](WalletError::Storage)
//!    - [`Unexpected`](WalletError::Unexpected)
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{ProviderError, WalletError};
//!
//! let err: WalletError = ProviderError::new(4001, "User rejected the request.").into();
//! assert!(err.is_user_rejection());
//! ```

use shared::{ChainId, ProviderKind};
use thiserror::Error;

/// Convenience type alias for `Result<T, WalletError>`.
pub type Result<T> = std::result::Result<T, WalletError>;

/// EIP-1193: the user rejected the request.
pub const USER_REJECTED_CODE: i64 = 4001;

/// `wallet_switchEthereumChain`: the chain has not been added to the wallet.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// Raw error reported by a wallet provider (`{ code, message }`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provider error {code}: {message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(USER_REJECTED_CODE, "User rejected the request.")
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == USER_REJECTED_CODE
    }
}

/// Session-wide error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// The user dismissed the wallet prompt.
    #[error("Request rejected in wallet: {0}")]
    UserRejected(String),

    /// No injected provider matches the requested kind.
    #[error("{} wallet not found", .0.name())]
    ProviderNotFound(ProviderKind),

    /// The wallet does not know the requested chain (code 4902).
    #[error("Chain {0} is not added to the wallet")]
    UnknownChain(ChainId),

    /// Any other failure of `wallet_switchEthereumChain`.
    #[error("Network switch failed: {0}")]
    SwitchFailed(String),

    /// Other provider / RPC failure.
    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },

    /// The wallet returned an empty account list on connect.
    #[error("Wallet returned no accounts")]
    NoAccounts,

    /// The operation needs a connected session.
    #[error("Wallet is not connected")]
    NotConnected,

    /// Malformed input caught before calling the wallet.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A newer connect or a disconnect overtook this connection attempt.
    #[error("Connection attempt was superseded")]
    Superseded,

    /// Durable storage failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Anything else.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl WalletError {
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, WalletError::UserRejected(_))
    }

    /// The attempt lost to a newer one; the session reflects the newer state.
    pub fn is_superseded(&self) -> bool {
        matches!(self, WalletError::Superseded)
    }

    /// Message suitable for an alert or inline warning.
    pub fn user_message(&self) -> String {
        match self {
            WalletError::UserRejected(_) => "Transaction Rejected".to_string(),
            WalletError::ProviderNotFound(kind) => {
                format!("{} was not found. Install the extension and reload.", kind.name())
            }
            WalletError::UnknownChain(chain) => format!(
                "{} is not configured in your wallet. Add it and try again.",
                chain.label()
            ),
            WalletError::SwitchFailed(_) => "Could not switch network. Please try again.".to_string(),
            WalletError::NoAccounts => "Your wallet did not share any account.".to_string(),
            WalletError::NotConnected => "Connect your wallet first.".to_string(),
            WalletError::Validation(msg) => msg.clone(),
            WalletError::Provider { .. } => "Wallet request failed. Please try again.".to_string(),
            WalletError::Superseded
            | WalletError::Storage(_)
            | WalletError::Unexpected(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Map a failed `wallet_switchEthereumChain` call.
    pub fn from_switch_error(err: ProviderError, target: ChainId) -> Self {
        match err.code {
            UNRECOGNIZED_CHAIN_CODE => WalletError::UnknownChain(target),
            USER_REJECTED_CODE => WalletError::UserRejected(err.message),
            _ => WalletError::SwitchFailed(err.message),
        }
    }
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        if err.is_user_rejection() {
            WalletError::UserRejected(err.message)
        } else {
            WalletError::Provider {
                code: err.code,
                message: err.message,
            }
        }
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Unexpected(format!("JSON error: {}", err))
    }
}

impl From<shared::AddressError> for WalletError {
    fn from(err: shared::AddressError) -> Self {
        WalletError::Validation(err.to_string())
    }
}

impl From<shared::ParseChainIdError> for WalletError {
    fn from(err: shared::ParseChainIdError) -> Self {
        WalletError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_code_maps_to_user_rejected() {
        let err: WalletError = ProviderError::user_rejected().into();
        assert!(err.is_user_rejection());
        assert_eq!(err.user_message(), "Transaction Rejected");
    }

    #[test]
    fn test_other_codes_map_to_provider() {
        let err: WalletError = ProviderError::new(-32603, "Internal JSON-RPC error").into();
        assert_eq!(
            err,
            WalletError::Provider {
                code: -32603,
                message: "Internal JSON-RPC error".to_string()
            }
        );
        assert!(!err.is_user_rejection());
    }

    #[test]
    fn test_switch_error_mapping() {
        let unknown = WalletError::from_switch_error(
            ProviderError::new(4902, "Unrecognized chain ID"),
            ChainId::POLYGON,
        );
        assert_eq!(unknown, WalletError::UnknownChain(ChainId::POLYGON));

        let rejected =
            WalletError::from_switch_error(ProviderError::user_rejected(), ChainId::ETHEREUM);
        assert!(rejected.is_user_rejection());

        let generic = WalletError::from_switch_error(
            ProviderError::new(-32002, "Request already pending"),
            ChainId::ETHEREUM,
        );
        assert_eq!(
            generic,
            WalletError::SwitchFailed("Request already pending".to_string())
        );
    }

    #[test]
    fn test_superseded_is_not_a_rejection() {
        let err = WalletError::Superseded;
        assert!(err.is_superseded());
        assert!(!err.is_user_rejection());
        assert!(!WalletError::Unexpected("boom".to_string()).is_superseded());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            WalletError::ProviderNotFound(ProviderKind::MetaMask).to_string(),
            "MetaMask wallet not found"
        );
        assert_eq!(
            WalletError::UnknownChain(ChainId::SEPOLIA).to_string(),
            "Chain 0xaa36a7 is not added to the wallet"
        );
    }
}
