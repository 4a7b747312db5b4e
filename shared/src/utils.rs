//! # Shared Utility Functions
//!
//! Address formatting used by both the session core and the web front-end.
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0x52908400098527886e0f7030069857d2e4169ee7";
//! assert_eq!(format_address(address, 6, 4), "0x5290...9ee7");
//! ```

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x52908400098527886e0f7030069857d2e4169ee7";
/// assert_eq!(format_address(addr, 6, 4), "0x5290...9ee7");
/// assert_eq!(format_address(addr, 4, 4), "0x52...9ee7");
/// assert_eq!(format_address("short", 4, 4), "short");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    // Guard against individual lengths exceeding address length to prevent panics
    if address_len <= prefix_len + suffix_len
        || prefix_len >= address_len
        || suffix_len >= address_len
        || !address.is_ascii()
    {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Format an EVM address as `0x` plus four leading and four trailing hex digits.
///
/// # Examples
///
/// ```rust
/// use shared::utils::truncate_address;
///
/// let addr = "0x52908400098527886e0f7030069857d2e4169ee7";
/// assert_eq!(truncate_address(addr), "0x5290...9ee7");
/// ```
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x52908400098527886e0f7030069857d2e4169ee7";

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(ADDR, 6, 4), "0x5290...9ee7");
        assert_eq!(format_address(ADDR, 2, 2), "0x...e7");
    }

    #[test]
    fn test_format_address_short() {
        assert_eq!(format_address("short", 4, 4), "short");
        assert_eq!(format_address("abc", 4, 4), "abc");
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(truncate_address(ADDR), "0x5290...9ee7");
    }
}
