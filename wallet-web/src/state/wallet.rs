//! Wallet state management
//!
//! [`WalletContext`] is the reactive face of the core session: UI code reads
//! the [`SessionSnapshot`] signal and calls the wrappers below, while the
//! session, the inactivity timer and the network guard themselves live in a
//! thread-local [`StoredValue`] (they are `Rc` based and not `Send`).

use std::rc::Rc;

use leptos::prelude::*;
use lib_core::{
    AutoDisconnect, ConnectOutcome, NetworkGuard, SessionConfig, Subscription, WalletError,
    WalletSession,
};
use shared::{ProviderKind, SessionSnapshot};

use crate::services::{browser_registry, BrowserClock, LocalStore};

/// Core handles shared by every component.
struct WalletCore {
    session: WalletSession,
    timer: AutoDisconnect,
    guard: NetworkGuard,
    _watch: Subscription,
}

/// Where a wallet error is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ErrorSurface {
    Silent,
    Rejected,
    Inline(String),
}

fn error_surface(err: &WalletError) -> ErrorSurface {
    if err.is_superseded() {
        ErrorSurface::Silent
    } else if err.is_user_rejection() {
        ErrorSurface::Rejected
    } else {
        ErrorSurface::Inline(err.user_message())
    }
}

/// Global wallet context
#[derive(Clone, Copy)]
pub struct WalletContext {
    /// Mirror of the session, updated after every state change.
    pub wallet: RwSignal<SessionSnapshot>,
    pub connecting: RwSignal<bool>,
    /// One-shot success animation after a user-initiated connect.
    pub show_success: RwSignal<bool>,
    /// "Transaction Rejected" overlay.
    pub rejected: RwSignal<bool>,
    /// Inline error message (provider missing, unexpected failure, ...).
    pub error: RwSignal<Option<String>>,
    pub auto_disconnect_enabled: RwSignal<bool>,
    core: StoredValue<WalletCore, LocalStorage>,
}

impl WalletContext {
    pub fn new() -> Self {
        let store = Rc::new(LocalStore::new());
        let session = WalletSession::new(browser_registry(), store.clone(), SessionConfig::default());
        let timer = AutoDisconnect::new(session.clone(), store, Rc::new(BrowserClock::new()));
        let guard = NetworkGuard::from_config(session.clone());

        let wallet = RwSignal::new(session.snapshot());
        let watch = session.watch(move |snapshot| wallet.set(snapshot.clone()));

        Self {
            wallet,
            connecting: RwSignal::new(false),
            show_success: RwSignal::new(false),
            rejected: RwSignal::new(false),
            error: RwSignal::new(None),
            auto_disconnect_enabled: RwSignal::new(timer.is_enabled()),
            core: StoredValue::new_local(WalletCore {
                session,
                timer,
                guard,
                _watch: watch,
            }),
        }
    }

    pub fn session(&self) -> WalletSession {
        self.core.with_value(|core| core.session.clone())
    }

    pub fn timer(&self) -> AutoDisconnect {
        self.core.with_value(|core| core.timer.clone())
    }

    pub fn guard(&self) -> NetworkGuard {
        self.core.with_value(|core| core.guard.clone())
    }

    pub fn is_connected(&self) -> bool {
        self.wallet.with(|state| state.is_connected())
    }

    /// Wallets detected in this browser.
    pub fn available_providers(&self) -> Vec<ProviderKind> {
        self.core.with_value(|core| core.session.registry().available())
    }

    /// User-initiated connect from the landing page or navbar.
    pub fn connect(&self, kind: ProviderKind) {
        let ctx = *self;
        let session = self.session();
        ctx.error.set(None);
        ctx.connecting.set(true);
        leptos::task::spawn_local(async move {
            match session.connect_wallet(kind, false).await {
                Ok(outcome) => ctx.on_connected(&outcome),
                Err(e) => ctx.report_error(&e),
            }
            // A newer attempt may still be pending
            ctx.connecting.set(session.is_connecting());
        });
    }

    pub fn disconnect(&self) {
        self.session().disconnect_wallet();
        self.show_success.set(false);
    }

    /// Switch to the session-wide required chain (navbar badge).
    pub fn switch_network(&self) {
        let ctx = *self;
        let session = self.session();
        leptos::task::spawn_local(async move {
            if let Err(e) = session.switch_network().await {
                ctx.report_error(&e);
            }
        });
    }

    pub fn set_auto_disconnect(&self, enabled: bool) {
        self.timer().set_enabled(enabled);
        self.auto_disconnect_enabled.set(enabled);
    }

    /// Route a failure to the right surface: rejections get the dismissible
    /// overlay, everything else an inline message. A superseded connect is
    /// dropped because the newer attempt owns the outcome.
    pub fn report_error(&self, err: &WalletError) {
        match error_surface(err) {
            ErrorSurface::Silent => log::debug!("Wallet connect superseded by a newer attempt"),
            ErrorSurface::Rejected => {
                log::info!("Wallet request rejected by user");
                self.rejected.set(true);
            }
            ErrorSurface::Inline(message) => {
                log::warn!("Wallet error: {}", err);
                self.error.set(Some(message));
            }
        }
    }

    fn on_connected(&self, outcome: &ConnectOutcome) {
        log::info!(
            "Connected {} on {}",
            outcome.address,
            outcome.chain_id.label()
        );
        if outcome.show_success {
            self.show_success.set(true);
        }
    }
}

impl Default for WalletContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the context and silently reconnect a remembered wallet.
pub fn provide_wallet_context() -> WalletContext {
    let context = WalletContext::new();
    provide_context(context);

    let session = context.session();
    leptos::task::spawn_local(async move {
        match session.restore().await {
            Ok(Some(outcome)) => context.on_connected(&outcome),
            Ok(None) => {}
            Err(e) => log::warn!("Could not restore wallet session: {}", e),
        }
    });

    context
}

pub fn use_wallet_context() -> WalletContext {
    expect_context::<WalletContext>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superseded_connect_is_silent() {
        assert_eq!(error_surface(&WalletError::Superseded), ErrorSurface::Silent);
    }

    #[test]
    fn test_rejection_uses_overlay() {
        let err = WalletError::UserRejected("User rejected the request.".to_string());
        assert_eq!(error_surface(&err), ErrorSurface::Rejected);
    }

    #[test]
    fn test_other_errors_show_inline() {
        let err = WalletError::ProviderNotFound(ProviderKind::Trust);
        assert_eq!(
            error_surface(&err),
            ErrorSurface::Inline("Trust Wallet was not found. Install the extension and reload.".to_string())
        );
    }
}
