//! Shared fixtures for the lib-core integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use lib_core::error::ProviderError;
use lib_core::provider::mock::MockProvider;
use lib_core::provider::Listener;
use lib_core::{
    AutoDisconnect, ManualClock, MemoryStore, NetworkGuard, ProviderRegistry, SessionConfig,
    Subscription, WalletProvider, WalletSession,
};
use serde_json::Value;
use shared::ProviderKind;
use tokio::sync::Notify;

/// A session wired to a scripted wallet, a fake clock and in-memory storage.
pub struct Harness {
    pub mock: MockProvider,
    pub store: MemoryStore,
    pub clock: ManualClock,
    pub session: WalletSession,
    pub timer: AutoDisconnect,
    pub guard: NetworkGuard,
}

impl Harness {
    pub fn new(mock: MockProvider) -> Self {
        Self::with_store(mock, MemoryStore::new())
    }

    /// Fresh session over an existing store, as after a page reload.
    pub fn with_store(mock: MockProvider, store: MemoryStore) -> Self {
        let registry = ProviderRegistry::new()
            .with(ProviderKind::MetaMask, mock.factory())
            .with(ProviderKind::Coinbase, || None);
        Self::with_registry(mock, store, registry)
    }

    /// Session whose MetaMask wallet can hold one request until released.
    pub fn gated(mock: MockProvider, store: MemoryStore) -> (Self, Rc<GatedProvider>) {
        let gated = Rc::new(GatedProvider::new(mock.clone()));
        let provider = gated.clone();
        let registry = ProviderRegistry::new().with(ProviderKind::MetaMask, move || {
            Some(provider.clone() as Rc<dyn WalletProvider>)
        });
        (Self::with_registry(mock, store, registry), gated)
    }

    fn with_registry(mock: MockProvider, store: MemoryStore, registry: ProviderRegistry) -> Self {
        init_tracing();
        let clock = ManualClock::new();
        let session = WalletSession::new(
            registry,
            Rc::new(store.clone()),
            SessionConfig::default(),
        );
        let timer = AutoDisconnect::new(
            session.clone(),
            Rc::new(store.clone()),
            Rc::new(clock.clone()),
        );
        let guard = NetworkGuard::from_config(session.clone());
        Self {
            mock,
            store,
            clock,
            session,
            timer,
            guard,
        }
    }

    pub async fn connect(&self) {
        self.session
            .connect_wallet(ProviderKind::MetaMask, false)
            .await
            .expect("mock wallet connects");
    }

    /// Advance the clock and run the recurring check once.
    pub fn idle(&self, by: Duration) -> lib_core::TimerStatus {
        self.clock.advance(by);
        self.timer.tick()
    }
}

/// Wallet that parks the next request for one method until released, so a
/// test can interleave other session calls while it is pending.
pub struct GatedProvider {
    inner: MockProvider,
    held_method: RefCell<Option<&'static str>>,
    entered: Notify,
    release: Notify,
}

impl GatedProvider {
    pub fn new(inner: MockProvider) -> Self {
        Self {
            inner,
            held_method: RefCell::new(None),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Park the next `method` request.
    pub fn hold_next(&self, method: &'static str) {
        *self.held_method.borrow_mut() = Some(method);
    }

    /// Resolves once the held request has reached the wallet.
    pub async fn held(&self) {
        self.entered.notified().await;
    }

    /// Let the held request continue.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait(?Send)]
impl WalletProvider for GatedProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let hold = {
            let mut held = self.held_method.borrow_mut();
            if *held == Some(method) {
                held.take();
                true
            } else {
                false
            }
        };
        if hold {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.request(method, params).await
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.inner.subscribe(listener)
    }
}

/// Install a test subscriber once; `RUST_LOG=debug` shows session logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
