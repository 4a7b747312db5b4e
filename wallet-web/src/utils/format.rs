//! # Formatting Utilities for Wallet Web
//!
//! Display strings for the session UI. For address formatting, use
//! [`shared::utils::truncate_address`] (or [`shared::SessionSnapshot::short_address`]).

use shared::ChainId;

/// Network label for the navbar badge.
///
/// # Examples
///
/// ```rust
/// use shared::ChainId;
/// use wallet_web::utils::format::format_network;
///
/// assert_eq!(format_network(Some(ChainId::POLYGON)), "Polygon");
/// assert_eq!(format_network(Some(ChainId(0x1234))), "0x1234");
/// assert_eq!(format_network(None), "Not connected");
/// ```
pub fn format_network(chain: Option<ChainId>) -> String {
    match chain {
        Some(chain) => chain.label(),
        None => "Not connected".to_string(),
    }
}

/// Countdown line of the inactivity overlay.
pub fn format_disconnect_warning(seconds_left: u64) -> String {
    let unit = if seconds_left == 1 { "second" } else { "seconds" };
    format!(
        "You will be disconnected in {} {} due to inactivity",
        seconds_left, unit
    )
}

/// Text of the network guard modal.
pub fn format_network_mismatch(required: ChainId, current: ChainId) -> String {
    format!(
        "This page requires {}, but your wallet is on {}.",
        required.label(),
        current.label()
    )
}

/// Shorten a hex signature for display (`0x1234abcd...9876`).
pub fn format_signature(signature: &str) -> String {
    shared::utils::format_address(signature, 10, 4)
}
