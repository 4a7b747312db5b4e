//! # Network Guard
//!
//! Routes may require a specific chain. The guard compares the wallet's live
//! chain with the requirement for the current route and drives the blocking
//! "switch network" prompt.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use shared::ChainId;
use tracing::{debug, warn};

use crate::config::RouteChains;
use crate::error::Result;
use crate::session::WalletSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    /// The route has no chain requirement.
    NoRequirement,
    /// The wallet is on the required chain.
    Satisfied { chain: ChainId },
    /// The wallet is on another chain; the prompt blocks the page.
    Mismatch { required: ChainId, current: ChainId },
    /// The route requires a chain but no wallet is connected.
    NotConnected,
}

impl GuardStatus {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, GuardStatus::Mismatch { .. })
    }
}

#[derive(Clone)]
pub struct NetworkGuard {
    session: WalletSession,
    routes: RouteChains,
    status: Rc<RefCell<GuardStatus>>,
    /// Bumped by every evaluation; a check that resolves after a newer one
    /// started must not overwrite the newer route's status.
    generation: Rc<Cell<u64>>,
}

impl NetworkGuard {
    pub fn new(session: WalletSession, routes: RouteChains) -> Self {
        Self {
            session,
            routes,
            status: Rc::new(RefCell::new(GuardStatus::NoRequirement)),
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Guard using the route table from the session configuration.
    pub fn from_config(session: WalletSession) -> Self {
        let routes = session.config().route_chains.clone();
        Self::new(session, routes)
    }

    pub fn routes(&self) -> &RouteChains {
        &self.routes
    }

    pub fn required_chain(&self, route: &str) -> Option<ChainId> {
        self.routes.required_for(route)
    }

    /// Pure comparison of `current` against the requirement of `route`.
    pub fn evaluate(&self, route: &str, current: Option<ChainId>) -> GuardStatus {
        match (self.routes.required_for(route), current) {
            (None, _) => GuardStatus::NoRequirement,
            (Some(_), None) => GuardStatus::NotConnected,
            (Some(required), Some(current)) if required == current => {
                GuardStatus::Satisfied { chain: current }
            }
            (Some(required), Some(current)) => GuardStatus::Mismatch { required, current },
        }
    }

    /// Read the live chain from the wallet and re-evaluate `route`.
    ///
    /// Only the latest evaluation is stored. When a newer `check`, `refresh`
    /// or `switch` started while this one awaited the wallet, its result is
    /// dropped and the status stored by the newer evaluation is returned.
    pub async fn check(&self, route: &str) -> Result<GuardStatus> {
        let generation = self.next_generation();
        let status = if self.routes.required_for(route).is_none() {
            GuardStatus::NoRequirement
        } else if !self.session.is_connected() {
            GuardStatus::NotConnected
        } else {
            let current = self.session.current_chain_id().await?;
            self.evaluate(route, Some(current))
        };
        if self.generation.get() != generation {
            debug!(route, ?status, "Discarding network check overtaken by a newer route");
            return Ok(self.status());
        }
        debug!(route, ?status, "Network guard evaluated");
        self.set_status(status);
        Ok(status)
    }

    /// Re-evaluate with the chain the session already knows (no wallet call).
    pub fn refresh(&self, route: &str) -> GuardStatus {
        self.next_generation();
        let status = self.evaluate(route, self.session.chain_id());
        self.set_status(status);
        status
    }

    /// Switch the wallet to the chain `route` requires, then re-check.
    ///
    /// If the user declines or the switch fails the previous status is kept
    /// and the error is returned.
    pub async fn switch(&self, route: &str) -> Result<GuardStatus> {
        let Some(required) = self.routes.required_for(route) else {
            self.next_generation();
            self.set_status(GuardStatus::NoRequirement);
            return Ok(GuardStatus::NoRequirement);
        };
        if let Err(err) = self.session.switch_network_to(required).await {
            warn!(route, required = %required, error = %err, "Network guard switch failed");
            return Err(err);
        }
        self.check(route).await
    }

    pub fn status(&self) -> GuardStatus {
        *self.status.borrow()
    }

    /// The blocking prompt is shown only on a mismatch.
    pub fn prompt_open(&self) -> bool {
        self.status().is_mismatch()
    }

    fn next_generation(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    fn set_status(&self, status: GuardStatus) {
        *self.status.borrow_mut() = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::error::WalletError;
    use crate::provider::mock::{MockProvider, SwitchBehavior};
    use crate::provider::ProviderRegistry;
    use crate::storage::MemoryStore;
    use shared::ProviderKind;

    fn guard(mock: &MockProvider) -> (WalletSession, NetworkGuard) {
        let registry = ProviderRegistry::new().with(ProviderKind::MetaMask, mock.factory());
        let session = WalletSession::new(
            registry,
            Rc::new(MemoryStore::new()),
            SessionConfig::default(),
        );
        let guard = NetworkGuard::from_config(session.clone());
        (session, guard)
    }

    #[test]
    fn test_evaluate_is_pure() {
        let (_, guard) = guard(&MockProvider::new());
        assert_eq!(guard.evaluate("/", Some(ChainId::POLYGON)), GuardStatus::NoRequirement);
        assert_eq!(guard.evaluate("/dashboard", None), GuardStatus::NotConnected);
        assert_eq!(
            guard.evaluate("/dashboard", Some(ChainId::ETHEREUM)),
            GuardStatus::Satisfied {
                chain: ChainId::ETHEREUM
            }
        );
        assert_eq!(
            guard.evaluate("/staking", Some(ChainId::ETHEREUM)),
            GuardStatus::Mismatch {
                required: ChainId::SEPOLIA,
                current: ChainId::ETHEREUM
            }
        );
        assert_eq!(guard.status(), GuardStatus::NoRequirement);
    }

    #[tokio::test]
    async fn test_check_without_session() {
        let mock = MockProvider::new();
        let (_, guard) = guard(&mock);
        assert_eq!(guard.check("/dashboard").await.unwrap(), GuardStatus::NotConnected);
        assert!(!guard.prompt_open());
        assert_eq!(mock.requests().len(), 0);
    }

    #[tokio::test]
    async fn test_declined_switch_keeps_prompt_open() {
        let mock = MockProvider::new().with_chain(ChainId::POLYGON);
        let (session, guard) = guard(&mock);
        session
            .connect_wallet(ProviderKind::MetaMask, false)
            .await
            .unwrap();
        assert!(guard.check("/dashboard").await.unwrap().is_mismatch());

        mock.set_switch_behavior(SwitchBehavior::Reject);
        let err = guard.switch("/dashboard").await.unwrap_err();
        assert!(err.is_user_rejection());
        assert!(guard.prompt_open());

        mock.set_switch_behavior(SwitchBehavior::UnknownChain);
        let err = guard.switch("/dashboard").await.unwrap_err();
        assert_eq!(err, WalletError::UnknownChain(ChainId::ETHEREUM));
        assert!(guard.prompt_open());
    }

    #[tokio::test]
    async fn test_refresh_uses_known_chain() {
        let mock = MockProvider::new();
        let (session, guard) = guard(&mock);
        session
            .connect_wallet(ProviderKind::MetaMask, false)
            .await
            .unwrap();
        mock.change_chain(ChainId::SEPOLIA);
        assert_eq!(
            guard.refresh("/mint"),
            GuardStatus::Satisfied {
                chain: ChainId::SEPOLIA
            }
        );
    }
}
