//! # Monotonic Clock
//!
//! The inactivity timer re-derives elapsed time from clock deltas on every
//! check instead of counting ticks, so a suspended tab that skips ticks still
//! sees the real elapsed time when it resumes.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Monotonic time source. `now()` is measured from an arbitrary origin and
/// never goes backwards.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Clock backed by `std::time::Instant`.
///
/// Not available on `wasm32-unknown-unknown`; the browser build supplies its
/// own clock over `performance.now()`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock for tests. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to `at`; earlier values are ignored to stay monotonic.
    pub fn set(&self, at: Duration) {
        if at > self.now.get() {
            self.now.set(at);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
