//! Auto-Disconnect Monitor
//!
//! While a wallet is connected and the feature is enabled, user input resets
//! the inactivity timer and a one-second interval drives the countdown. On
//! expiry the session is already gone; this component only redirects.

use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;
use lib_core::{ActivityKind, TimerStatus};
use wasm_bindgen::JsCast;
use web_sys::EventTarget;

use crate::state::wallet::use_wallet_context;
use crate::utils::dom::DomListener;
use crate::utils::format::format_disconnect_warning;

/// Everything that must stop when tracking stops.
struct Tracking {
    _listeners: Vec<DomListener>,
    _interval: Interval,
}

#[component]
pub fn AutoDisconnectMonitor() -> impl IntoView {
    let ctx = use_wallet_context();
    let countdown = RwSignal::new(None::<u64>);
    let tracking = StoredValue::new_local(None::<Tracking>);
    let navigate = StoredValue::new_local(use_navigate());

    let apply = move |status: TimerStatus| match status {
        TimerStatus::Warning { seconds_left } => countdown.set(Some(seconds_left)),
        TimerStatus::Expired { redirect_to } => {
            countdown.set(None);
            log::info!("Wallet disconnected after inactivity");
            navigate.with_value(|navigate| navigate(&redirect_to, NavigateOptions::default()));
        }
        TimerStatus::Idle { .. } | TimerStatus::Inactive => countdown.set(None),
    };

    Effect::new(move |_| {
        let active = ctx.wallet.with(|state| state.connected) && ctx.auto_disconnect_enabled.get();
        if !active {
            // Dropping the handles removes the listeners and clears the interval
            tracking.set_value(None);
            countdown.set(None);
            return;
        }
        if tracking.with_value(Option::is_some) {
            return;
        }
        tracking.set_value(Some(start_tracking(ctx.timer(), apply)));
    });

    on_cleanup(move || tracking.set_value(None));

    let stay_connected = move |_| {
        ctx.timer().record_activity(ActivityKind::Click);
        countdown.set(None);
    };

    view! {
        <Show when=move || countdown.get().is_some()>
            <div class="overlay auto-disconnect-overlay" role="alertdialog">
                <div class="card">
                    <h2>"Still there?"</h2>
                    <p>{move || countdown.get().map(format_disconnect_warning)}</p>
                    <button class="btn" on:click=stay_connected>"Stay connected"</button>
                </div>
            </div>
        </Show>
    }
}

fn start_tracking(
    timer: lib_core::AutoDisconnect,
    apply: impl Fn(TimerStatus) + Copy + 'static,
) -> Tracking {
    let window = gloo_utils::window();
    let window_target: &EventTarget = window.unchecked_ref();
    let document = gloo_utils::document();
    let document_target: &EventTarget = document.unchecked_ref();

    let mut listeners = Vec::new();
    for kind in ActivityKind::all() {
        let timer = timer.clone();
        listeners.extend(DomListener::new(window_target, kind.event_name(), move |_| {
            let was_warning = timer.status().is_warning();
            timer.record_activity(kind);
            if was_warning {
                apply(timer.status());
            }
        }));
    }

    // Background tabs throttle intervals; catch up as soon as the page is back
    let foreground = {
        let timer = timer.clone();
        move |_: web_sys::Event| {
            if !gloo_utils::document().hidden() {
                apply(timer.on_foreground());
            }
        }
    };
    listeners.extend(DomListener::new(document_target, "visibilitychange", foreground.clone()));
    listeners.extend(DomListener::new(window_target, "focus", foreground));

    let interval_ms = timer.session().config().check_interval.as_millis() as u32;
    let ticking = timer.clone();
    let interval = Interval::new(interval_ms, move || apply(ticking.tick()));

    log::debug!("Auto-disconnect tracking started");
    Tracking {
        _listeners: listeners,
        _interval: interval,
    }
}
