//! # Wallet Session
//!
//! [`WalletSession`] is the single source of truth for the connected wallet:
//! which provider was chosen, the selected account, the current chain and
//! whether that chain is the required one.
//!
//! ## Lifecycle
//!
//! ```text
//! Disconnected ──connect_wallet──▶ Connecting ──ok──▶ Connected { correct_network }
//!       ▲                               │                        │
//!       └──────────── error ────────────┘                        │
//!       └──────── disconnect_wallet / accountsChanged([]) ───────┘
//! ```
//!
//! Connecting is internal; readers only ever observe connected or not.
//!
//! ## Threading
//!
//! The session is single-threaded (`Rc` + `RefCell`). State borrows are
//! released before every `.await` and before observers or provider listeners
//! run, so a callback may call back into the session.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> lib_core::Result<()> {
//! use std::rc::Rc;
//! use lib_core::provider::{mock::MockProvider, ProviderRegistry};
//! use lib_core::{MemoryStore, SessionConfig, WalletSession};
//! use shared::ProviderKind;
//!
//! let wallet = MockProvider::new();
//! let registry = ProviderRegistry::new().with(ProviderKind::MetaMask, wallet.factory());
//! let session = WalletSession::new(registry, Rc::new(MemoryStore::new()), SessionConfig::default());
//!
//! let outcome = session.connect_wallet(ProviderKind::MetaMask, false).await?;
//! assert!(outcome.show_success);
//! # Ok(())
//! # }
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use lib_utils::validation::validate_hex_address;
use shared::{Address, ChainId, PersistedConnection, ProviderKind, SessionSnapshot};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{Result, WalletError};
use crate::provider::{
    read_chain_id, request_accounts, switch_chain, Listener, ProviderEvent, ProviderRegistry,
    Signer, Subscription,
};
use crate::storage::{self, KeyValueStore};

/// Result of a successful [`WalletSession::connect_wallet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOutcome {
    pub address: Address,
    pub chain_id: ChainId,
    pub correct_network: bool,
    /// False for silent reconnects, which must not replay the success animation.
    pub show_success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Disconnected,
    Connecting,
    Connected,
}

struct SessionState {
    phase: Phase,
    signer: Option<Signer>,
    chain_id: Option<ChainId>,
    correct_network: bool,
    connected_at: Option<DateTime<Utc>>,
    subscription: Option<Subscription>,
    /// Bumped on every connect attempt and disconnect so a slow connect that
    /// was overtaken does not overwrite newer state.
    epoch: u64,
}

impl SessionState {
    fn new() -> Self {
        Self {
            phase: Phase::Disconnected,
            signer: None,
            chain_id: None,
            correct_network: false,
            connected_at: None,
            subscription: None,
            epoch: 0,
        }
    }

    /// Reset to disconnected, handing back the subscription so it can be
    /// dropped outside the borrow.
    fn reset(&mut self) -> Option<Subscription> {
        self.phase = Phase::Disconnected;
        self.signer = None;
        self.chain_id = None;
        self.correct_network = false;
        self.connected_at = None;
        self.subscription.take()
    }
}

type Observer = Rc<dyn Fn(&SessionSnapshot)>;

struct SessionInner {
    registry: ProviderRegistry,
    store: Rc<dyn KeyValueStore>,
    config: SessionConfig,
    state: RefCell<SessionState>,
    observers: RefCell<Vec<(u64, Observer)>>,
    next_observer: Cell<u64>,
}

/// Handle to the wallet session. Clones share the same session.
#[derive(Clone)]
pub struct WalletSession {
    inner: Rc<SessionInner>,
}

impl WalletSession {
    pub fn new(
        registry: ProviderRegistry,
        store: Rc<dyn KeyValueStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                registry,
                store,
                config,
                state: RefCell::new(SessionState::new()),
                observers: RefCell::new(Vec::new()),
                next_observer: Cell::new(0),
            }),
        }
    }

    // region:    --- Readers

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.inner.registry
    }

    pub fn is_connected(&self) -> bool {
        self.inner.state.borrow().phase == Phase::Connected
    }

    /// True while a connect attempt is awaiting the wallet.
    pub fn is_connecting(&self) -> bool {
        self.inner.state.borrow().phase == Phase::Connecting
    }

    pub fn address(&self) -> Option<Address> {
        self.connected_signer().map(|signer| signer.address().clone())
    }

    pub fn chain_id(&self) -> Option<ChainId> {
        let state = self.inner.state.borrow();
        match state.phase {
            Phase::Connected => state.chain_id,
            _ => None,
        }
    }

    pub fn correct_network(&self) -> bool {
        let state = self.inner.state.borrow();
        state.phase == Phase::Connected && state.correct_network
    }

    pub fn provider_kind(&self) -> Option<ProviderKind> {
        self.connected_signer().map(|signer| signer.kind())
    }

    pub fn connected_at(&self) -> Option<DateTime<Utc>> {
        self.inner.state.borrow().connected_at
    }

    /// Signer for the selected account, if connected.
    pub fn signer(&self) -> Option<Signer> {
        self.connected_signer()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state.borrow();
        if state.phase != Phase::Connected {
            return SessionSnapshot::disconnected();
        }
        SessionSnapshot {
            provider: state.signer.as_ref().map(Signer::kind),
            address: state.signer.as_ref().map(|s| s.address().clone()),
            connected: true,
            correct_network: state.correct_network,
            chain_id: state.chain_id,
        }
    }

    /// Live `eth_chainId` from the wallet; also refreshes `correct_network`.
    pub async fn current_chain_id(&self) -> Result<ChainId> {
        let signer = self.connected_signer().ok_or(WalletError::NotConnected)?;
        let chain = signer.chain_id().await?;
        self.apply_chain(chain);
        Ok(chain)
    }

    fn connected_signer(&self) -> Option<Signer> {
        let state = self.inner.state.borrow();
        match state.phase {
            Phase::Connected => state.signer.clone(),
            _ => None,
        }
    }

    // endregion: --- Readers

    // region:    --- Lifecycle

    /// Connect to the wallet of `kind`.
    ///
    /// `is_auto_connect` marks a silent reconnect after a reload; the outcome
    /// then carries `show_success == false`.
    pub async fn connect_wallet(
        &self,
        kind: ProviderKind,
        is_auto_connect: bool,
    ) -> Result<ConnectOutcome> {
        if self.is_connected() || self.is_connecting() {
            debug!(provider = %kind, "Replacing existing wallet session");
            self.disconnect_wallet();
        }

        let epoch = {
            let mut state = self.inner.state.borrow_mut();
            state.epoch += 1;
            state.phase = Phase::Connecting;
            state.epoch
        };

        match self.establish(kind, is_auto_connect, epoch).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let stale = {
                    let mut state = self.inner.state.borrow_mut();
                    if state.epoch == epoch {
                        state.reset()
                    } else {
                        None
                    }
                };
                drop(stale);
                if err.is_superseded() {
                    debug!(provider = %kind, "Wallet connection superseded");
                } else if err.is_user_rejection() {
                    warn!(provider = %kind, "Wallet connection rejected by user");
                } else {
                    warn!(provider = %kind, error = %err, "Wallet connection failed");
                }
                Err(err)
            }
        }
    }

    async fn establish(
        &self,
        kind: ProviderKind,
        is_auto_connect: bool,
        epoch: u64,
    ) -> Result<ConnectOutcome> {
        let provider = self.inner.registry.resolve(kind)?;

        let accounts = request_accounts(provider.as_ref()).await?;
        let first = accounts.first().ok_or(WalletError::NoAccounts)?;
        let address = parse_account(first)?;
        let chain = read_chain_id(provider.as_ref()).await?;

        if self.inner.state.borrow().epoch != epoch {
            return Err(WalletError::Superseded);
        }

        let subscription = provider.subscribe(self.event_listener());
        let correct_network = chain == self.inner.config.required_chain;
        let signer = Signer::new(kind, address.clone(), provider);

        let previous = {
            let mut state = self.inner.state.borrow_mut();
            state.phase = Phase::Connected;
            state.signer = Some(signer);
            state.chain_id = Some(chain);
            state.correct_network = correct_network;
            state.connected_at = Some(lib_utils::now_utc());
            state.subscription.replace(subscription)
        };
        drop(previous);

        self.persist(kind, &address);
        info!(
            provider = %kind,
            address = %address,
            chain = %chain,
            auto = is_auto_connect,
            "Wallet connected"
        );
        self.notify();

        Ok(ConnectOutcome {
            address,
            chain_id: chain,
            correct_network,
            show_success: !is_auto_connect,
        })
    }

    /// Tear down the session and forget the persisted connection.
    ///
    /// Safe to call any number of times.
    pub fn disconnect_wallet(&self) {
        let (was_active, subscription) = {
            let mut state = self.inner.state.borrow_mut();
            state.epoch += 1;
            let was_active = state.phase != Phase::Disconnected;
            (was_active, state.reset())
        };
        // Dropping outside the borrow: unsubscribing may re-enter the provider
        drop(subscription);

        if let Err(e) = storage::clear_connection(self.inner.store.as_ref()) {
            warn!(error = %e, "Failed to clear persisted wallet connection");
        }

        if was_active {
            info!("Wallet disconnected");
            self.notify();
        }
    }

    /// Silent reconnect from the persisted record, if any.
    ///
    /// A record that can no longer be honoured is removed. If a newer connect
    /// overtakes the restore, the restore yields `Ok(None)` and leaves the
    /// record written by that connect in place.
    pub async fn restore(&self) -> Result<Option<ConnectOutcome>> {
        let record = match storage::load_connection(self.inner.store.as_ref()) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Could not read persisted wallet connection");
                None
            }
        };
        let Some(record) = record else {
            return Ok(None);
        };

        debug!(provider = %record.provider_kind, "Restoring wallet session");
        match self.connect_wallet(record.provider_kind, true).await {
            Ok(outcome) => {
                if outcome.address != record.address {
                    debug!(
                        previous = %record.address,
                        current = %outcome.address,
                        "Wallet account changed since last visit"
                    );
                }
                Ok(Some(outcome))
            }
            // A newer connect owns the record now (or a disconnect already removed it)
            Err(WalletError::Superseded) => Ok(None),
            Err(err) => {
                if let Err(e) = storage::clear_connection(self.inner.store.as_ref()) {
                    warn!(error = %e, "Failed to clear stale wallet connection");
                }
                Err(err)
            }
        }
    }

    /// Switch to the configured required chain.
    pub async fn switch_network(&self) -> Result<ChainId> {
        self.switch_network_to(self.inner.config.required_chain).await
    }

    /// Ask the wallet to switch to `chain`, then re-read the chain.
    pub async fn switch_network_to(&self, chain: ChainId) -> Result<ChainId> {
        let signer = self.connected_signer().ok_or(WalletError::NotConnected)?;
        info!(chain = %chain, "Requesting network switch");

        if let Err(err) = switch_chain(signer.provider().as_ref(), chain).await {
            warn!(chain = %chain, error = %err, "Network switch failed");
            return Err(err);
        }

        let current = self.current_chain_id().await?;
        if current != chain {
            return Err(WalletError::SwitchFailed(format!(
                "wallet is still on {}",
                current.label()
            )));
        }
        Ok(current)
    }

    // endregion: --- Lifecycle

    // region:    --- Provider Events

    fn event_listener(&self) -> Listener {
        let weak: Weak<SessionInner> = Rc::downgrade(&self.inner);
        Rc::new(move |event: &ProviderEvent| {
            if let Some(inner) = weak.upgrade() {
                WalletSession { inner }.handle_event(event);
            }
        })
    }

    /// Apply a provider event. Events are handled in emission order.
    pub fn handle_event(&self, event: &ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => self.handle_accounts_changed(accounts),
            ProviderEvent::ChainChanged(raw) => self.handle_chain_changed(raw),
        }
    }

    fn handle_accounts_changed(&self, accounts: &[String]) {
        let Some(signer) = self.connected_signer() else {
            return;
        };

        let Some(first) = accounts.first() else {
            info!(provider = %signer.kind(), "Wallet revoked account access");
            self.disconnect_wallet();
            return;
        };

        let address = match parse_account(first) {
            Ok(address) => address,
            Err(e) => {
                warn!(error = %e, "Ignoring malformed account from wallet");
                return;
            }
        };
        if &address == signer.address() {
            return;
        }

        {
            let mut state = self.inner.state.borrow_mut();
            state.signer = Some(signer.with_address(address.clone()));
        }
        self.persist(signer.kind(), &address);
        info!(address = %address, "Wallet account changed");
        self.notify();
    }

    fn handle_chain_changed(&self, raw: &str) {
        if !self.is_connected() {
            return;
        }
        match ChainId::from_hex(raw) {
            Ok(chain) => self.apply_chain(chain),
            Err(e) => warn!(error = %e, "Ignoring malformed chain id from wallet"),
        }
    }

    fn apply_chain(&self, chain: ChainId) {
        let required = self.inner.config.required_chain;
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            if state.phase != Phase::Connected || state.chain_id == Some(chain) {
                false
            } else {
                state.chain_id = Some(chain);
                state.correct_network = chain == required;
                true
            }
        };
        if changed {
            debug!(
                chain = %chain,
                required = %required,
                correct = chain == required,
                "Wallet chain changed"
            );
            self.notify();
        }
    }

    // endregion: --- Provider Events

    // region:    --- Observers

    /// Register `observer`; it receives a snapshot after every state change.
    pub fn watch(&self, observer: impl Fn(&SessionSnapshot) + 'static) -> Subscription {
        let id = self.inner.next_observer.get();
        self.inner.next_observer.set(id + 1);
        self.inner
            .observers
            .borrow_mut()
            .push((id, Rc::new(observer)));

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .observers
                    .borrow_mut()
                    .retain(|(existing, _)| *existing != id);
            }
        })
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let observers: Vec<Observer> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer(&snapshot);
        }
    }

    // endregion: --- Observers

    fn persist(&self, kind: ProviderKind, address: &Address) {
        let record = PersistedConnection {
            provider_kind: kind,
            address: address.clone(),
        };
        if let Err(e) = storage::save_connection(self.inner.store.as_ref(), &record) {
            warn!(error = %e, "Failed to persist wallet connection");
        }
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

fn parse_account(raw: &str) -> Result<Address> {
    validate_hex_address(raw).map_err(WalletError::Validation)?;
    Ok(Address::parse(raw)?)
}
