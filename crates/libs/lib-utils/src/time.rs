//! # Time Utilities
//!
//! Wall-clock helpers using chrono, and the countdown formatting shown by the
//! auto-disconnect warning.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format time as RFC3339 string.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Whole seconds left, rounded up, so a countdown never shows `0` before it expires.
///
/// ```rust
/// use std::time::Duration;
/// use lib_utils::time::format_countdown;
///
/// assert_eq!(format_countdown(Duration::from_millis(4_200)), "5");
/// assert_eq!(format_countdown(Duration::from_secs(5)), "5");
/// ```
pub fn format_countdown(remaining: Duration) -> String {
    ceil_secs(remaining).to_string()
}

/// `mm:ss` rendering for longer durations (`04:55`).
pub fn format_duration_mmss(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Seconds rounded up.
pub fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
