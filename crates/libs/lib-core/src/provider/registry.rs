//! Provider registry: named factories selected by [`ProviderKind`].
//!
//! A factory returns `None` when its wallet is not installed, which is how
//! "no provider found" surfaces without probing globals at call sites.

use std::fmt;
use std::rc::Rc;

use shared::ProviderKind;

use super::WalletProvider;
use crate::error::{Result, WalletError};

type Factory = Box<dyn Fn() -> Option<Rc<dyn WalletProvider>>>;

#[derive(Default)]
pub struct ProviderRegistry {
    factories: Vec<(ProviderKind, Factory)>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for `kind`.
    pub fn register<F>(&mut self, kind: ProviderKind, factory: F) -> &mut Self
    where
        F: Fn() -> Option<Rc<dyn WalletProvider>> + 'static,
    {
        self.factories.retain(|(existing, _)| *existing != kind);
        self.factories.push((kind, Box::new(factory)));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, kind: ProviderKind, factory: F) -> Self
    where
        F: Fn() -> Option<Rc<dyn WalletProvider>> + 'static,
    {
        self.register(kind, factory);
        self
    }

    /// Resolve the provider for `kind`.
    pub fn resolve(&self, kind: ProviderKind) -> Result<Rc<dyn WalletProvider>> {
        self.factories
            .iter()
            .find(|(existing, _)| *existing == kind)
            .and_then(|(_, factory)| factory())
            .ok_or(WalletError::ProviderNotFound(kind))
    }

    /// Kinds whose factory currently yields a provider.
    pub fn available(&self) -> Vec<ProviderKind> {
        self.factories
            .iter()
            .filter(|(_, factory)| factory().is_some())
            .map(|(kind, _)| *kind)
            .collect()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.factories.iter().map(|(kind, _)| kind))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockProvider;

    #[test]
    fn test_resolve_registered_provider() {
        let mock = MockProvider::new();
        let registry = ProviderRegistry::new().with(ProviderKind::MetaMask, mock.factory());
        assert!(registry.resolve(ProviderKind::MetaMask).is_ok());
    }

    #[test]
    fn test_missing_provider_is_not_found() {
        let registry = ProviderRegistry::new().with(ProviderKind::Okx, || None);
        assert_eq!(
            registry.resolve(ProviderKind::Okx).err(),
            Some(WalletError::ProviderNotFound(ProviderKind::Okx))
        );
        assert_eq!(
            registry.resolve(ProviderKind::Trust).err(),
            Some(WalletError::ProviderNotFound(ProviderKind::Trust))
        );
    }

    #[test]
    fn test_available_lists_installed_only() {
        let mock = MockProvider::new();
        let registry = ProviderRegistry::new()
            .with(ProviderKind::MetaMask, mock.factory())
            .with(ProviderKind::Coinbase, || None);
        assert_eq!(registry.available(), vec![ProviderKind::MetaMask]);
    }

    #[test]
    fn test_register_replaces_existing_factory() {
        let mock = MockProvider::new();
        let mut registry = ProviderRegistry::new();
        registry.register(ProviderKind::MetaMask, || None);
        registry.register(ProviderKind::MetaMask, mock.factory());
        assert!(registry.resolve(ProviderKind::MetaMask).is_ok());
    }
}
