//! # Auto-Disconnect Tests
//!
//! Inactivity threshold, countdown and preference behaviour, driven by a
//! manual clock and by the tokio monitor under paused time.

mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use common::Harness;
use lib_core::monitor::{self, TokioClock};
use lib_core::provider::mock::MockProvider;
use lib_core::storage::CONNECTION_KEY;
use lib_core::{
    ActivityKind, AutoDisconnect, MemoryStore, ProviderRegistry, SessionConfig, TimerStatus,
    WalletSession,
};
use shared::ProviderKind;
use tokio::sync::watch;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

#[tokio::test]
async fn test_regular_activity_keeps_session() {
    // Arrange
    let harness = Harness::new(MockProvider::new());
    harness.connect().await;

    // Act: one hour of activity, never more than 4:59 apart
    for _ in 0..12 {
        assert!(!matches!(harness.idle(secs(299)), TimerStatus::Expired { .. }));
        harness.timer.record_activity(ActivityKind::PointerMove);
    }

    // Assert
    assert!(harness.session.is_connected());
}

#[tokio::test]
async fn test_countdown_timeline() {
    // Arrange
    let harness = Harness::new(MockProvider::new());
    harness.connect().await;

    // Act / Assert: 4:54 idle shows nothing
    assert!(matches!(harness.idle(secs(294)), TimerStatus::Idle { .. }));
    assert_eq!(harness.timer.warning_seconds_left(), None);

    // 4:55 starts the countdown at 5
    assert_eq!(harness.idle(secs(1)), TimerStatus::Warning { seconds_left: 5 });
    assert_eq!(harness.idle(secs(1)), TimerStatus::Warning { seconds_left: 4 });

    // 5:00 disconnects and redirects home
    assert_eq!(
        harness.idle(secs(4)),
        TimerStatus::Expired {
            redirect_to: "/".to_string()
        }
    );
    assert!(!harness.session.is_connected());
    assert!(!harness.store.contains(CONNECTION_KEY));
}

#[tokio::test]
async fn test_keypress_during_countdown_resets() {
    let harness = Harness::new(MockProvider::new());
    harness.connect().await;
    assert!(harness.idle(secs(297)).is_warning());

    harness.timer.record_activity(ActivityKind::KeyPress);

    assert_eq!(harness.timer.warning_seconds_left(), None);
    assert!(matches!(harness.idle(secs(5)), TimerStatus::Idle { .. }));
    assert!(harness.session.is_connected());
}

#[tokio::test]
async fn test_expiry_disconnects_exactly_once() {
    // Arrange
    let harness = Harness::new(MockProvider::new());
    harness.connect().await;
    let disconnects = Rc::new(RefCell::new(0));
    let counter = disconnects.clone();
    let _watch = harness.session.watch(move |snapshot| {
        if !snapshot.connected {
            *counter.borrow_mut() += 1;
        }
    });

    // Act: far past the threshold, with repeated checks
    harness.clock.advance(secs(900));
    let statuses: Vec<_> = (0..3).map(|_| harness.timer.tick()).collect();

    // Assert
    assert!(matches!(statuses[0], TimerStatus::Expired { .. }));
    assert_eq!(statuses[1], TimerStatus::Inactive);
    assert_eq!(statuses[2], TimerStatus::Inactive);
    assert_eq!(*disconnects.borrow(), 1);
}

#[tokio::test]
async fn test_disabling_during_countdown_prevents_disconnect() {
    // Arrange
    let harness = Harness::new(MockProvider::new());
    harness.connect().await;
    assert!(harness.idle(secs(296)).is_warning());

    // Act
    harness.timer.set_enabled(false);

    // Assert: warning gone and no cutoff however long we wait
    assert_eq!(harness.timer.warning_seconds_left(), None);
    assert_eq!(harness.idle(secs(3600)), TimerStatus::Inactive);
    assert!(harness.session.is_connected());

    // Re-enabling starts a fresh period
    harness.timer.set_enabled(true);
    assert!(matches!(harness.idle(secs(10)), TimerStatus::Idle { .. }));
    assert!(matches!(harness.idle(secs(290)), TimerStatus::Expired { .. }));
}

#[tokio::test]
async fn test_preference_survives_disconnect_and_reload() {
    let harness = Harness::new(MockProvider::new());
    harness.connect().await;
    harness.timer.set_enabled(false);
    harness.session.disconnect_wallet();

    let reloaded = Harness::with_store(MockProvider::new(), harness.store.clone());
    assert!(!reloaded.timer.is_enabled());
}

#[tokio::test]
async fn test_timer_idle_while_disconnected() {
    let harness = Harness::new(MockProvider::new());
    assert_eq!(harness.idle(secs(600)), TimerStatus::Inactive);

    // Tracking starts at connect time, not at construction
    harness.connect().await;
    assert!(matches!(harness.idle(secs(60)), TimerStatus::Idle { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_monitor_disconnects_after_timeout() {
    // Arrange
    let mock = MockProvider::new();
    let store = MemoryStore::new();
    let registry = ProviderRegistry::new().with(ProviderKind::MetaMask, mock.factory());
    let session = WalletSession::new(registry, Rc::new(store.clone()), SessionConfig::default());
    let timer = AutoDisconnect::new(
        session.clone(),
        Rc::new(store.clone()),
        Rc::new(TokioClock::new()),
    );
    session
        .connect_wallet(ProviderKind::MetaMask, false)
        .await
        .unwrap();

    let statuses = Rc::new(RefCell::new(Vec::new()));
    let sink = statuses.clone();
    let (stop_tx, stop_rx) = watch::channel(false);

    // Act
    let monitor = monitor::run(timer, secs(1), stop_rx, move |status| {
        sink.borrow_mut().push(status.clone());
    });
    let script = async {
        tokio::time::sleep(secs(302)).await;
        stop_tx.send(true).unwrap();
    };
    tokio::join!(monitor, script);

    // Assert
    let statuses = statuses.borrow();
    let expired = statuses
        .iter()
        .filter(|s| matches!(s, TimerStatus::Expired { .. }))
        .count();
    assert_eq!(expired, 1);
    assert!(statuses.iter().any(|s| *s == TimerStatus::Warning { seconds_left: 5 }));
    assert_eq!(statuses.last(), Some(&TimerStatus::Inactive));
    assert!(!session.is_connected());
}

#[tokio::test(start_paused = true)]
async fn test_monitor_stops_when_sender_dropped() {
    let harness = Harness::new(MockProvider::new());
    let (stop_tx, stop_rx) = watch::channel(false);
    drop(stop_tx);
    monitor::run(harness.timer.clone(), secs(1), stop_rx, |_| {}).await;
}
