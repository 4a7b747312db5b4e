//! Connected-account handle.
//!
//! A [`Signer`] is what consumers get instead of the raw provider: it knows
//! which account is selected and exposes the few calls pages need.

use std::fmt;
use std::rc::Rc;

use serde_json::json;
use shared::{Address, ChainId, ProviderKind};

use super::{methods, read_chain_id, WalletProvider};
use crate::error::{Result, WalletError};

#[derive(Clone)]
pub struct Signer {
    kind: ProviderKind,
    address: Address,
    provider: Rc<dyn WalletProvider>,
}

impl Signer {
    pub fn new(kind: ProviderKind, address: Address, provider: Rc<dyn WalletProvider>) -> Self {
        Self {
            kind,
            address,
            provider,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn provider(&self) -> &Rc<dyn WalletProvider> {
        &self.provider
    }

    /// Same provider, different selected account.
    pub fn with_address(&self, address: Address) -> Self {
        Self {
            address,
            ..self.clone()
        }
    }

    /// Live `eth_chainId`.
    pub async fn chain_id(&self) -> Result<ChainId> {
        read_chain_id(self.provider.as_ref()).await
    }

    /// `personal_sign` over the UTF-8 bytes of `message`.
    pub async fn sign_message(&self, message: &str) -> Result<String> {
        let payload = format!("0x{}", hex::encode(message.as_bytes()));
        let value = self
            .provider
            .request(
                methods::PERSONAL_SIGN,
                json!([payload, self.address.as_str()]),
            )
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WalletError::Unexpected(format!("personal_sign returned {}", value)))
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("kind", &self.kind)
            .field("address", &self.address)
            .finish()
    }
}
