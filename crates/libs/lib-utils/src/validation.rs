//! # Validation Utilities
//!
//! Input validation helpers, run before anything is sent to a wallet.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate an EVM address: `0x` followed by exactly 40 hex digits.
pub fn validate_hex_address(value: &str) -> Result<(), String> {
    let digits = strip_hex_prefix(value)
        .ok_or_else(|| format!("Address must start with 0x: {}", value))?;
    if digits.len() != 40 {
        return Err(format!(
            "Address must have 40 hex digits, got {}",
            digits.len()
        ));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Address contains non-hex characters: {}", value));
    }
    Ok(())
}

/// Validate a JSON-RPC hex quantity such as a chain id (`0x1`, `0x89`).
pub fn validate_hex_quantity(value: &str) -> Result<(), String> {
    match strip_hex_prefix(value) {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()) => {
            Ok(())
        }
        _ => Err(format!("Invalid hex quantity: {}", value)),
    }
}

fn strip_hex_prefix(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
}
