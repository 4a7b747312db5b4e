//! Injected EVM Wallet Integration via wasm-bindgen
//!
//! Browser wallets inject an EIP-1193 object into the page. This module finds
//! that object for each supported [`ProviderKind`] and adapts it to
//! [`lib_core::WalletProvider`] so the session never touches JavaScript.

use std::rc::Rc;

use async_trait::async_trait;
use js_sys::{Function, Object, Promise, Reflect};
use lib_core::error::ProviderError;
use lib_core::provider::{Listener, ProviderEvent, ProviderRegistry, Subscription, WalletProvider};
use serde::Serialize;
use serde_json::Value;
use shared::ProviderKind;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// JSON-RPC "internal error", used when the JS side fails without a code.
const INTERNAL_ERROR_CODE: i64 = -32603;

// ============================================================================
// PROVIDER DETECTION (JavaScript Interop)
// ============================================================================

#[wasm_bindgen(inline_js = "
export function findEvmProvider(key) {
    const eth = window.ethereum;
    // Several extensions installed at once share window.ethereum.providers
    const injected = eth && Array.isArray(eth.providers) ? eth.providers : (eth ? [eth] : []);

    switch (key) {
        case 'metamask':
            return injected.find(p => p && p.isMetaMask && !p.isBraveWallet) || null;
        case 'okx':
            return window.okxwallet || injected.find(p => p && p.isOkxWallet) || null;
        case 'coinbase':
            return window.coinbaseWalletExtension
                || injected.find(p => p && p.isCoinbaseWallet)
                || null;
        case 'trust':
            return window.trustwallet || injected.find(p => p && p.isTrust) || null;
        default:
            return null;
    }
}
")]
extern "C" {
    /// Injected provider object for `key`, or `null` when not installed.
    #[wasm_bindgen(js_name = findEvmProvider)]
    fn find_evm_provider(key: &str) -> JsValue;
}

/// Registry over the wallets injected into this page.
///
/// Detection runs on every resolve, so a wallet installed after page load
/// is picked up without a reload of the registry.
pub fn browser_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for &kind in ProviderKind::all() {
        registry.register(kind, move || {
            InjectedProvider::detect(kind).map(|p| Rc::new(p) as Rc<dyn WalletProvider>)
        });
    }
    registry
}

// ============================================================================
// INJECTED PROVIDER
// ============================================================================

/// EIP-1193 object injected by a browser extension.
#[derive(Clone)]
pub struct InjectedProvider {
    kind: ProviderKind,
    inner: Object,
}

impl InjectedProvider {
    pub fn detect(kind: ProviderKind) -> Option<Self> {
        let found = find_evm_provider(kind.key());
        if found.is_null() || found.is_undefined() {
            return None;
        }
        found
            .dyn_into::<Object>()
            .ok()
            .map(|inner| Self { kind, inner })
    }

    fn method(&self, name: &str) -> Result<Function, ProviderError> {
        Reflect::get(&self.inner, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| {
                ProviderError::new(
                    INTERNAL_ERROR_CODE,
                    format!("{} does not expose {}()", self.kind.name(), name),
                )
            })
    }
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let args = Object::new();
        Reflect::set(&args, &"method".into(), &JsValue::from_str(method)).map_err(js_error)?;
        Reflect::set(&args, &"params".into(), &to_js(&params)?).map_err(js_error)?;

        let request = self.method("request")?;
        let result = request.call1(&self.inner, &args).map_err(js_error)?;
        let resolved = match result.dyn_into::<Promise>() {
            Ok(promise) => JsFuture::from(promise).await.map_err(js_error)?,
            Err(value) => value,
        };

        if resolved.is_undefined() || resolved.is_null() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(resolved).map_err(|e| {
            ProviderError::new(
                INTERNAL_ERROR_CODE,
                format!("Unexpected {} response: {}", method, e),
            )
        })
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        let (on, remove) = match (self.method("on"), self.method("removeListener")) {
            (Ok(on), Ok(remove)) => (on, remove),
            _ => {
                log::warn!("{} does not support event listeners", self.kind.name());
                return Subscription::noop();
            }
        };

        let accounts_listener = listener.clone();
        let on_accounts = Closure::<dyn Fn(JsValue)>::new(move |value: JsValue| {
            if let Some(event) = accounts_event(serde_wasm_bindgen::from_value(value)) {
                accounts_listener(&event);
            }
        });
        let on_chain = Closure::<dyn Fn(JsValue)>::new(move |value: JsValue| {
            if let Some(chain) = value.as_string() {
                listener(&ProviderEvent::ChainChanged(chain));
            }
        });

        let handlers = [
            ("accountsChanged", on_accounts),
            ("chainChanged", on_chain),
        ];
        for (event, closure) in &handlers {
            if let Err(e) = on.call2(&self.inner, &JsValue::from_str(event), closure.as_ref()) {
                log::warn!("Failed to register {} listener: {:?}", event, e);
            }
        }

        let target = self.inner.clone();
        Subscription::new(move || {
            for (event, closure) in &handlers {
                let _ = remove.call2(&target, &JsValue::from_str(event), closure.as_ref());
            }
            // Closures are freed here, after the wallet stopped referencing them
            drop(handlers);
        })
    }
}

/// An empty list means revoked access; a payload that cannot be read is
/// logged and ignored rather than treated as a revocation.
fn accounts_event<E: std::fmt::Display>(
    parsed: std::result::Result<Vec<String>, E>,
) -> Option<ProviderEvent> {
    match parsed {
        Ok(accounts) => Some(ProviderEvent::AccountsChanged(accounts)),
        Err(e) => {
            log::warn!("Ignoring malformed accountsChanged payload: {}", e);
            None
        }
    }
}

fn to_js(params: &Value) -> Result<JsValue, ProviderError> {
    // Plain JS objects and arrays, not Maps, as wallets expect
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    params
        .serialize(&serializer)
        .map_err(|e| ProviderError::new(INTERNAL_ERROR_CODE, e.to_string()))
}

/// Convert a thrown / rejected JS value into `{ code, message }`.
fn js_error(err: JsValue) -> ProviderError {
    let code = Reflect::get(&err, &"code".into())
        .ok()
        .and_then(|c| c.as_f64())
        .map(|c| c as i64)
        .unwrap_or(INTERNAL_ERROR_CODE);
    let message = Reflect::get(&err, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    ProviderError::new(code, message)
}
