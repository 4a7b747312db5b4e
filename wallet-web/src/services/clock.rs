//! Monotonic clock over `performance.now()`.

use std::time::Duration;

use lib_core::Clock;
use web_sys::Performance;

/// `performance.now()` keeps counting while a background tab is throttled,
/// which is what the inactivity timer relies on.
#[derive(Clone)]
pub struct BrowserClock {
    performance: Option<Performance>,
}

impl BrowserClock {
    pub fn new() -> Self {
        Self {
            performance: gloo_utils::window().performance(),
        }
    }
}

impl Default for BrowserClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for BrowserClock {
    fn now(&self) -> Duration {
        let millis = match &self.performance {
            Some(performance) => performance.now(),
            // Wall clock fallback; only monotonic as long as the system time is
            None => js_sys::Date::now(),
        };
        Duration::from_secs_f64(millis.max(0.0) / 1000.0)
    }
}
