//! `window.localStorage` adapter.

use lib_core::error::{Result, WalletError};
use lib_core::KeyValueStore;
use web_sys::Storage;

/// Durable storage backed by the browser's local storage.
///
/// The storage handle is looked up on every call; private browsing modes may
/// deny access, which surfaces as [`WalletError::Storage`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<Storage> {
        gloo_utils::window()
            .local_storage()
            .map_err(|e| WalletError::Storage(format!("localStorage unavailable: {:?}", e)))?
            .ok_or_else(|| WalletError::Storage("localStorage unavailable".to_string()))
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| WalletError::Storage(format!("read {} failed: {:?}", key, e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| WalletError::Storage(format!("write {} failed: {:?}", key, e)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| WalletError::Storage(format!("remove {} failed: {:?}", key, e)))
    }
}
