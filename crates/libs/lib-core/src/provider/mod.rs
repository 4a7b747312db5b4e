//! # Wallet Provider Abstraction
//!
//! An EIP-1193 style provider reduced to what the session needs: a JSON-RPC
//! `request` and an event subscription. Concrete providers are the injected
//! browser wallets (in `wallet-web`) and [`mock::MockProvider`] for tests.
//!
//! ## Subscriptions
//!
//! [`WalletProvider::subscribe`] returns a [`Subscription`]. Dropping it (or
//! calling [`Subscription::cancel`]) removes the listener exactly once, so the
//! owner releases its listeners by simply dropping its handles.
//!
//! ## Related Modules
//!
//! - [`registry`]: `ProviderKind` → provider factory lookup
//! - [`signer`]: connected-account handle wrapping a provider

pub mod mock;
pub mod registry;
pub mod signer;

use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::ChainId;

use crate::error::{ProviderError, Result, WalletError};

pub use registry::ProviderRegistry;
pub use signer::Signer;

/// JSON-RPC methods used by the session.
pub mod methods {
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    pub const ACCOUNTS: &str = "eth_accounts";
    pub const CHAIN_ID: &str = "eth_chainId";
    pub const SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
    pub const PERSONAL_SIGN: &str = "personal_sign";
}

/// Events emitted by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// `accountsChanged`; an empty list means the wallet revoked access.
    AccountsChanged(Vec<String>),
    /// `chainChanged`, carrying the raw chain id string.
    ChainChanged(String),
}

impl ProviderEvent {
    /// EIP-1193 event name.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderEvent::AccountsChanged(_) => "accountsChanged",
            ProviderEvent::ChainChanged(_) => "chainChanged",
        }
    }
}

/// Callback registered with [`WalletProvider::subscribe`].
pub type Listener = Rc<dyn Fn(&ProviderEvent)>;

/// EIP-1193 style wallet provider.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Send a JSON-RPC request to the wallet.
    async fn request(&self, method: &str, params: Value) -> std::result::Result<Value, ProviderError>;

    /// Register `listener` for `accountsChanged` and `chainChanged`.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

/// Handle to a registered listener; dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to release.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Unsubscribe now.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// `eth_requestAccounts`: prompts the user when the site is not yet authorized.
pub async fn request_accounts(provider: &dyn WalletProvider) -> Result<Vec<String>> {
    let value = provider
        .request(methods::REQUEST_ACCOUNTS, json!([]))
        .await?;
    Ok(serde_json::from_value(value)?)
}

/// `eth_chainId` parsed into a [`ChainId`].
pub async fn read_chain_id(provider: &dyn WalletProvider) -> Result<ChainId> {
    let value = provider.request(methods::CHAIN_ID, json!([])).await?;
    let raw = value
        .as_str()
        .ok_or_else(|| WalletError::Unexpected(format!("eth_chainId returned {}", value)))?;
    Ok(ChainId::from_hex(raw)?)
}

/// `wallet_switchEthereumChain` with the distinct `4902` mapping.
pub async fn switch_chain(provider: &dyn WalletProvider, chain: ChainId) -> Result<()> {
    provider
        .request(methods::SWITCH_CHAIN, json!([{ "chainId": chain.to_hex() }]))
        .await
        .map(|_| ())
        .map_err(|e| WalletError::from_switch_error(e, chain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscription_releases_once() {
        let released = Rc::new(Cell::new(0));
        let counter = released.clone();
        let subscription = Subscription::new(move || counter.set(counter.get() + 1));
        subscription.cancel();
        assert_eq!(released.get(), 1);

        let counter = released.clone();
        {
            let _subscription = Subscription::new(move || counter.set(counter.get() + 1));
        }
        assert_eq!(released.get(), 2);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ProviderEvent::AccountsChanged(vec![]).name(), "accountsChanged");
        assert_eq!(ProviderEvent::ChainChanged("0x1".into()).name(), "chainChanged");
    }
}
