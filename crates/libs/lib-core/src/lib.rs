//! # Core Library
//!
//! Wallet session lifecycle for the BlockE dashboard: the connected-wallet
//! session, the inactivity auto-disconnect timer and the per-route network
//! guard, independent of any UI framework.
//!
//! Everything here is single-threaded. The browser build drives it from the
//! UI event loop; native tests drive it from a tokio current-thread runtime.

pub mod auto_disconnect;
pub mod clock;
pub mod config;
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod monitor;
pub mod network_guard;
pub mod provider;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use auto_disconnect::{ActivityKind, AutoDisconnect, TimerStatus};
pub use clock::{Clock, ManualClock};
pub use config::{RouteChains, SessionConfig};
pub use error::{ProviderError, Result, WalletError};
pub use network_guard::{GuardStatus, NetworkGuard};
pub use provider::{ProviderEvent, ProviderRegistry, Signer, Subscription, WalletProvider};
pub use session::{ConnectOutcome, WalletSession};
pub use storage::{KeyValueStore, MemoryStore};
