//! Native driver for the auto-disconnect timer.
//!
//! The browser drives [`AutoDisconnect::tick`] from a DOM interval; native
//! hosts (tests, desktop shells) use [`run`] on a tokio current-thread
//! runtime or `LocalSet`, since the session is not `Send`.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::auto_disconnect::{AutoDisconnect, TimerStatus};
use crate::clock::Clock;

/// Clock following tokio's time, so paused-time tests advance it too.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Tick `timer` every `interval` until `shutdown` flips to `true` (or its
/// sender is dropped). Each status is handed to `on_status`.
pub async fn run<F>(
    timer: AutoDisconnect,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
    mut on_status: F,
) where
    F: FnMut(&TimerStatus),
{
    let mut ticker = time::interval(interval);
    // Elapsed time comes from the clock, so bursts of missed ticks add nothing
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(interval_ms = interval.as_millis() as u64, "Auto-disconnect monitor started");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let status = timer.tick();
                on_status(&status);
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    debug!("Auto-disconnect monitor stopped");
}
