//! Browser services: injected wallets, local storage and the page clock.

pub mod clock;
pub mod storage;
pub mod wallet;

pub use clock::BrowserClock;
pub use storage::LocalStore;
pub use wallet::{browser_registry, InjectedProvider};
