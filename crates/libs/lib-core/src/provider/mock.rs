//! Scripted in-memory wallet provider.
//!
//! Behaves like an injected EIP-1193 wallet: answers the handful of RPC
//! methods the session uses, emits `chainChanged` after a successful switch,
//! and delivers scripted events to live listeners in registration order.
//! Clones share state, so a test keeps one handle while the registry hands
//! another to the session.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::ChainId;

use super::{methods, Listener, ProviderEvent, Subscription, WalletProvider};
use crate::error::{ProviderError, UNRECOGNIZED_CHAIN_CODE};

/// Account the mock exposes unless told otherwise.
pub const DEFAULT_ACCOUNT: &str = "0x52908400098527886e0f7030069857d2e4169ee7";

/// Outcome of `wallet_switchEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchBehavior {
    /// Switch and emit `chainChanged`.
    Ok,
    /// Fail with code 4902.
    UnknownChain,
    /// Fail with a generic RPC error.
    Fail(String),
    /// Fail with code 4001.
    Reject,
}

struct MockState {
    accounts: Vec<String>,
    chain: ChainId,
    reject_connect: bool,
    reject_signing: bool,
    switch: SwitchBehavior,
    requests: Vec<(String, Value)>,
    listeners: Vec<(u64, Listener)>,
    next_listener: u64,
}

#[derive(Clone)]
pub struct MockProvider {
    state: Rc<RefCell<MockState>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// One account ([`DEFAULT_ACCOUNT`]) on Ethereum mainnet.
    pub fn new() -> Self {
        let state = MockState {
            accounts: vec![DEFAULT_ACCOUNT.to_string()],
            chain: ChainId::ETHEREUM,
            reject_connect: false,
            reject_signing: false,
            switch: SwitchBehavior::Ok,
            requests: Vec::new(),
            listeners: Vec::new(),
            next_listener: 0,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn with_accounts(self, accounts: &[&str]) -> Self {
        self.set_accounts(accounts.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn with_chain(self, chain: ChainId) -> Self {
        self.state.borrow_mut().chain = chain;
        self
    }

    /// Replace the account list without emitting an event.
    pub fn set_accounts(&self, accounts: Vec<String>) {
        self.state.borrow_mut().accounts = accounts;
    }

    /// Make `eth_requestAccounts` fail with code 4001.
    pub fn set_reject_connect(&self, reject: bool) {
        self.state.borrow_mut().reject_connect = reject;
    }

    /// Make `personal_sign` fail with code 4001.
    pub fn set_reject_signing(&self, reject: bool) {
        self.state.borrow_mut().reject_signing = reject;
    }

    pub fn set_switch_behavior(&self, behavior: SwitchBehavior) {
        self.state.borrow_mut().switch = behavior;
    }

    pub fn chain(&self) -> ChainId {
        self.state.borrow().chain
    }

    /// User picked another account (or revoked access with an empty list).
    pub fn change_accounts(&self, accounts: &[&str]) {
        let accounts: Vec<String> = accounts.iter().map(|a| a.to_string()).collect();
        self.set_accounts(accounts.clone());
        self.emit(ProviderEvent::AccountsChanged(accounts));
    }

    /// User switched network from the wallet UI.
    pub fn change_chain(&self, chain: ChainId) {
        self.state.borrow_mut().chain = chain;
        self.emit(ProviderEvent::ChainChanged(chain.to_hex()));
    }

    /// Deliver `event` to every live listener.
    pub fn emit(&self, event: ProviderEvent) {
        // Listeners may unsubscribe while handling the event
        let listeners: Vec<Listener> = self
            .state
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.state.borrow().requests.clone()
    }

    pub fn request_count(&self, method: &str) -> usize {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }

    pub fn as_provider(&self) -> Rc<dyn WalletProvider> {
        Rc::new(self.clone())
    }

    /// Registry factory yielding this mock.
    pub fn factory(&self) -> impl Fn() -> Option<Rc<dyn WalletProvider>> + 'static {
        let mock = self.clone();
        move || Some(mock.as_provider())
    }

    fn switch_to(&self, params: &Value) -> Result<Value, ProviderError> {
        let target = params
            .get(0)
            .and_then(|p| p.get("chainId"))
            .and_then(Value::as_str)
            .and_then(|raw| ChainId::from_hex(raw).ok())
            .ok_or_else(|| ProviderError::new(-32602, "Invalid chainId parameter"))?;

        let behavior = self.state.borrow().switch.clone();
        match behavior {
            SwitchBehavior::Ok => {
                if self.chain() != target {
                    self.change_chain(target);
                }
                Ok(Value::Null)
            }
            SwitchBehavior::UnknownChain => Err(ProviderError::new(
                UNRECOGNIZED_CHAIN_CODE,
                format!("Unrecognized chain ID \"{}\"", target),
            )),
            SwitchBehavior::Fail(message) => Err(ProviderError::new(-32603, message)),
            SwitchBehavior::Reject => Err(ProviderError::user_rejected()),
        }
    }
}

#[async_trait(?Send)]
impl WalletProvider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.state
            .borrow_mut()
            .requests
            .push((method.to_string(), params.clone()));

        match method {
            methods::REQUEST_ACCOUNTS => {
                let state = self.state.borrow();
                if state.reject_connect {
                    return Err(ProviderError::user_rejected());
                }
                Ok(json!(state.accounts))
            }
            methods::ACCOUNTS => Ok(json!(self.state.borrow().accounts)),
            methods::CHAIN_ID => Ok(json!(self.chain().to_hex())),
            methods::SWITCH_CHAIN => self.switch_to(&params),
            methods::PERSONAL_SIGN => {
                if self.state.borrow().reject_signing {
                    return Err(ProviderError::user_rejected());
                }
                let payload = params.get(0).and_then(Value::as_str).unwrap_or_default();
                Ok(json!(format!("0x{}", hex::encode(payload.as_bytes()))))
            }
            other => Err(ProviderError::new(
                -32601,
                format!("The method \"{}\" does not exist", other),
            )),
        }
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_listener;
            state.next_listener += 1;
            state.listeners.push((id, listener));
            id
        };
        let weak: Weak<RefCell<MockState>> = Rc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().listeners.retain(|(existing, _)| *existing != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<ProviderEvent>>>, Listener) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let listener: Listener = Rc::new(move |event: &ProviderEvent| {
            sink.borrow_mut().push(event.clone());
        });
        (seen, listener)
    }

    #[tokio::test]
    async fn test_answers_session_methods() {
        let mock = MockProvider::new().with_chain(ChainId::SEPOLIA);
        let accounts = mock
            .request(methods::REQUEST_ACCOUNTS, json!([]))
            .await
            .unwrap();
        assert_eq!(accounts, json!([DEFAULT_ACCOUNT]));
        let chain = mock.request(methods::CHAIN_ID, json!([])).await.unwrap();
        assert_eq!(chain, json!("0xaa36a7"));
        assert_eq!(mock.request_count(methods::CHAIN_ID), 1);
    }

    #[tokio::test]
    async fn test_switch_emits_chain_changed() {
        let mock = MockProvider::new().with_chain(ChainId::POLYGON);
        let (seen, listener) = recorder();
        let _subscription = mock.subscribe(listener);

        mock.request(methods::SWITCH_CHAIN, json!([{ "chainId": "0x1" }]))
            .await
            .unwrap();

        assert_eq!(mock.chain(), ChainId::ETHEREUM);
        assert_eq!(
            *seen.borrow(),
            vec![ProviderEvent::ChainChanged("0x1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_switch_failures() {
        let mock = MockProvider::new().with_chain(ChainId::POLYGON);
        let params = json!([{ "chainId": "0x1" }]);

        mock.set_switch_behavior(SwitchBehavior::UnknownChain);
        let err = mock.request(methods::SWITCH_CHAIN, params.clone()).await.unwrap_err();
        assert_eq!(err.code, UNRECOGNIZED_CHAIN_CODE);

        mock.set_switch_behavior(SwitchBehavior::Reject);
        let err = mock.request(methods::SWITCH_CHAIN, params).await.unwrap_err();
        assert!(err.is_user_rejection());
        assert_eq!(mock.chain(), ChainId::POLYGON);
    }

    #[test]
    fn test_dropping_subscription_removes_listener() {
        let mock = MockProvider::new();
        let (seen, listener) = recorder();
        let subscription = mock.subscribe(listener);
        assert_eq!(mock.listener_count(), 1);

        mock.change_accounts(&[]);
        drop(subscription);
        assert_eq!(mock.listener_count(), 0);

        mock.change_chain(ChainId::BASE);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let mock = MockProvider::new();
        let err = mock.request("eth_sendTransaction", json!([])).await.unwrap_err();
        assert_eq!(err.code, -32601);
    }
}
