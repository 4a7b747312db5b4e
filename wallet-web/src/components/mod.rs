//! UI Components

pub mod auto_disconnect;
pub mod connect_toast;
pub mod navbar;
pub mod network_guard;
pub mod rejected_overlay;

pub use auto_disconnect::AutoDisconnectMonitor;
pub use connect_toast::ConnectToast;
pub use navbar::Navbar;
pub use network_guard::NetworkGuardModal;
pub use rejected_overlay::RejectedOverlay;
