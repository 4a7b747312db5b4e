//! One-time "wallet connected" toast. Silent reconnects never trigger it.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;

use crate::state::wallet::use_wallet_context;
use crate::utils::constants::CONNECT_TOAST_MS;

#[component]
pub fn ConnectToast() -> impl IntoView {
    let ctx = use_wallet_context();

    Effect::new(move |_| {
        if ctx.show_success.get() {
            leptos::task::spawn_local(async move {
                TimeoutFuture::new(CONNECT_TOAST_MS).await;
                ctx.show_success.set(false);
            });
        }
    });

    view! {
        <Show when=move || ctx.show_success.get()>
            <div class="toast toast-success">
                "Wallet connected "
                {move || ctx.wallet.with(|state| state.short_address()).unwrap_or_default()}
            </div>
        </Show>
    }
}
