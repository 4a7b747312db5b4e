//! # Durable Key-Value Storage
//!
//! String-valued storage with no expiry, standing in for `window.localStorage`.
//! The browser implements [`KeyValueStore`] over `web_sys::Storage`; tests and
//! native tools use [`MemoryStore`].
//!
//! Two keys are used:
//!
//! - [`CONNECTION_KEY`]: JSON [`PersistedConnection`], cleared on disconnect
//! - [`AUTO_DISCONNECT_KEY`]: `"true"` / `"false"`, survives disconnects

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use shared::PersistedConnection;

use crate::error::{Result, WalletError};

pub const CONNECTION_KEY: &str = "blocke.walletConnection";
pub const AUTO_DISCONNECT_KEY: &str = "blocke.autoDisconnectEnabled";

/// Durable string storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store. Clones share the same map, so a clone handed to a fresh
/// session behaves like the same browser profile after a reload.
#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read the persisted connection record.
///
/// A record that no longer parses is removed and treated as absent.
pub fn load_connection(store: &dyn KeyValueStore) -> Result<Option<PersistedConnection>> {
    let Some(raw) = store.get(CONNECTION_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str::<PersistedConnection>(&raw) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding corrupt wallet connection record");
            store.remove(CONNECTION_KEY)?;
            Ok(None)
        }
    }
}

pub fn save_connection(store: &dyn KeyValueStore, record: &PersistedConnection) -> Result<()> {
    let json = serde_json::to_string(record)?;
    store.set(CONNECTION_KEY, &json)
}

pub fn clear_connection(store: &dyn KeyValueStore) -> Result<()> {
    store.remove(CONNECTION_KEY)
}

/// Stored auto-disconnect preference, if the user ever set one.
pub fn load_preference(store: &dyn KeyValueStore) -> Result<Option<bool>> {
    match store.get(AUTO_DISCONNECT_KEY)?.as_deref() {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(WalletError::Storage(format!(
            "invalid {} value: {:?}",
            AUTO_DISCONNECT_KEY, other
        ))),
    }
}

pub fn save_preference(store: &dyn KeyValueStore, enabled: bool) -> Result<()> {
    store.set(AUTO_DISCONNECT_KEY, if enabled { "true" } else { "false" })
}
