//! Settings Page - session preferences

use leptos::prelude::*;
use lib_utils::time::format_duration_mmss;

use crate::state::wallet::use_wallet_context;

#[component]
pub fn SettingsPage() -> impl IntoView {
    let wallet_ctx = use_wallet_context();
    let config = wallet_ctx.session().config().clone();
    let timeout = format_duration_mmss(config.inactivity_timeout);
    let warning = config.warning_window.as_secs();

    view! {
        <div class="app-container page-centered">
            <div class="card" style="width: 100%; max-width: 560px;">
                <h1 class="card-title">"Settings"</h1>

                <label class="setting-row">
                    <input
                        type="checkbox"
                        prop:checked=move || wallet_ctx.auto_disconnect_enabled.get()
                        on:change=move |ev| wallet_ctx.set_auto_disconnect(event_target_checked(&ev))
                    />
                    "Auto-disconnect when inactive"
                </label>
                <p class="card-subtitle">
                    "After " {timeout} " without mouse, keyboard or scroll activity the wallet is disconnected. "
                    "A " {warning} " second countdown appears first."
                </p>
                <p class="card-subtitle">"This preference is remembered on this device."</p>
            </div>
        </div>
    }
}
