//! # Auto-Disconnect
//!
//! Disconnects the wallet after a period without user activity, showing a
//! short countdown first. The timer only runs while the feature is enabled
//! and a session is connected.
//!
//! Elapsed time is always `clock.now() - last_activity`, recomputed on every
//! [`tick`](AutoDisconnect::tick). Missed ticks (a throttled background tab)
//! therefore never delay the cutoff, and [`on_foreground`](AutoDisconnect::on_foreground)
//! catches up immediately when the tab is shown again.
//!
//! The enabled preference is persisted and survives disconnects.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use lib_utils::time::ceil_secs;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::provider::Subscription;
use crate::session::WalletSession;
use crate::storage::{self, KeyValueStore};

/// User input that counts as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    PointerMove,
    KeyPress,
    Scroll,
    Click,
}

impl ActivityKind {
    /// DOM event name this activity is observed through.
    pub fn event_name(&self) -> &'static str {
        match self {
            ActivityKind::PointerMove => "mousemove",
            ActivityKind::KeyPress => "keydown",
            ActivityKind::Scroll => "scroll",
            ActivityKind::Click => "click",
        }
    }

    pub fn all() -> [ActivityKind; 4] {
        [
            ActivityKind::PointerMove,
            ActivityKind::KeyPress,
            ActivityKind::Scroll,
            ActivityKind::Click,
        ]
    }
}

/// Outcome of a timer check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerStatus {
    /// Disabled, or no wallet connected.
    Inactive,
    /// Counting down silently.
    Idle { remaining: Duration },
    /// Inside the warning window; `seconds_left` is rounded up.
    Warning { seconds_left: u64 },
    /// The session was just disconnected; navigate to `redirect_to`.
    Expired { redirect_to: String },
}

impl TimerStatus {
    pub fn is_warning(&self) -> bool {
        matches!(self, TimerStatus::Warning { .. })
    }
}

struct TimerState {
    enabled: bool,
    last_activity: Option<Duration>,
    status: TimerStatus,
}

struct TimerInner {
    session: WalletSession,
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    state: RefCell<TimerState>,
    session_watch: RefCell<Option<Subscription>>,
}

/// Inactivity timer bound to a [`WalletSession`]. Clones share the timer.
#[derive(Clone)]
pub struct AutoDisconnect {
    inner: Rc<TimerInner>,
}

impl AutoDisconnect {
    /// Create the timer, restoring the persisted preference (default on).
    pub fn new(session: WalletSession, store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        let enabled = match storage::load_preference(store.as_ref()) {
            Ok(stored) => stored.unwrap_or(true),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable auto-disconnect preference");
                true
            }
        };
        let last_activity = session.is_connected().then(|| clock.now());

        let timer = Self {
            inner: Rc::new(TimerInner {
                session,
                store,
                clock,
                state: RefCell::new(TimerState {
                    enabled,
                    last_activity,
                    status: TimerStatus::Inactive,
                }),
                session_watch: RefCell::new(None),
            }),
        };

        // Start counting at connect time, stop on disconnect
        let weak = Rc::downgrade(&timer.inner);
        let subscription = timer.inner.session.watch(move |snapshot| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let now = inner.clock.now();
            let mut state = inner.state.borrow_mut();
            if snapshot.connected {
                if state.last_activity.is_none() {
                    state.last_activity = Some(now);
                }
            } else {
                state.last_activity = None;
                state.status = TimerStatus::Inactive;
            }
        });
        *timer.inner.session_watch.borrow_mut() = Some(subscription);

        debug!(enabled, "Auto-disconnect timer ready");
        timer
    }

    pub fn session(&self) -> &WalletSession {
        &self.inner.session
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.state.borrow().enabled
    }

    /// True when activity is being tracked (enabled and connected).
    pub fn is_tracking(&self) -> bool {
        self.is_enabled() && self.inner.session.is_connected()
    }

    /// Last computed status.
    pub fn status(&self) -> TimerStatus {
        self.inner.state.borrow().status.clone()
    }

    /// Countdown value while the warning is showing.
    pub fn warning_seconds_left(&self) -> Option<u64> {
        match self.inner.state.borrow().status {
            TimerStatus::Warning { seconds_left } => Some(seconds_left),
            _ => None,
        }
    }

    /// Reset the inactivity clock and hide any pending warning.
    pub fn record_activity(&self, kind: ActivityKind) {
        if !self.is_tracking() {
            return;
        }
        let timeout = self.inner.session.config().inactivity_timeout;
        let now = self.inner.clock.now();
        let mut state = self.inner.state.borrow_mut();
        if state.status.is_warning() {
            debug!(activity = kind.event_name(), "Activity cancelled pending disconnect");
        }
        state.last_activity = Some(now);
        state.status = TimerStatus::Idle { remaining: timeout };
    }

    /// Turn the feature on or off and persist the choice.
    pub fn set_enabled(&self, enabled: bool) {
        if let Err(e) = storage::save_preference(self.inner.store.as_ref(), enabled) {
            warn!(error = %e, "Failed to persist auto-disconnect preference");
        }
        let connected = self.inner.session.is_connected();
        let now = self.inner.clock.now();
        let mut state = self.inner.state.borrow_mut();
        state.enabled = enabled;
        state.status = TimerStatus::Inactive;
        state.last_activity = (enabled && connected).then_some(now);
        info!(enabled, "Auto-disconnect preference changed");
    }

    /// Re-evaluate the timer.
    ///
    /// On expiry the session is disconnected here, exactly once: the
    /// disconnect stops tracking, so later ticks report `Inactive`.
    pub fn tick(&self) -> TimerStatus {
        let config = self.inner.session.config();
        let now = self.inner.clock.now();
        let connected = self.inner.session.is_connected();

        let status = {
            let mut state = self.inner.state.borrow_mut();
            if !state.enabled || !connected {
                state.last_activity = None;
                state.status = TimerStatus::Inactive;
                return TimerStatus::Inactive;
            }

            let last = *state.last_activity.get_or_insert(now);
            let idle = now.saturating_sub(last);
            let status = if idle >= config.inactivity_timeout {
                state.last_activity = None;
                TimerStatus::Expired {
                    redirect_to: config.landing_route.clone(),
                }
            } else if idle >= config.warning_after() {
                TimerStatus::Warning {
                    seconds_left: ceil_secs(config.inactivity_timeout - idle),
                }
            } else {
                TimerStatus::Idle {
                    remaining: config.inactivity_timeout - idle,
                }
            };
            state.status = status.clone();
            status
        };

        if let TimerStatus::Expired { redirect_to } = &status {
            info!(
                timeout_secs = config.inactivity_timeout.as_secs(),
                redirect = %redirect_to,
                "Auto-disconnecting inactive wallet"
            );
            self.inner.session.disconnect_wallet();
            // The session watcher reset the status; keep reporting the expiry
            self.inner.state.borrow_mut().status = status.clone();
        }
        status
    }

    /// The page became visible or regained focus.
    pub fn on_foreground(&self) -> TimerStatus {
        self.tick()
    }
}

impl fmt::Debug for AutoDisconnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("AutoDisconnect")
            .field("enabled", &state.enabled)
            .field("last_activity", &state.last_activity)
            .field("status", &state.status)
            .finish()
    }
}
