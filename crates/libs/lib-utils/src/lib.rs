//! # Utilities Library
//!
//! Shared utility functions for environment variables, time formatting, and validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_or, get_env_parse};
pub use time::{format_countdown, format_duration_mmss, format_time, now_utc};
pub use validation::{validate_hex_address, validate_hex_quantity, validate_not_empty};
