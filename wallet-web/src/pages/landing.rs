//! Landing Page - pick a wallet to connect

use leptos::prelude::*;
use leptos_router::components::A;
use shared::ProviderKind;

use crate::state::wallet::use_wallet_context;
use crate::utils::constants::{APP_NAME, ROUTE_DASHBOARD};

#[component]
pub fn LandingPage() -> impl IntoView {
    let wallet_ctx = use_wallet_context();
    let available = wallet_ctx.available_providers();

    view! {
        <div class="app-container page-centered">
            <div class="card" style="width: 100%; max-width: 480px;">
                <h1 class="card-title">{APP_NAME}</h1>
                <p class="card-subtitle">"Connect a browser wallet to open your dashboard."</p>

                {move || {
                    if wallet_ctx.is_connected() {
                        view! {
                            <div>
                                <p class="status-ok">
                                    "Connected as "
                                    {wallet_ctx.wallet.with(|state| state.short_address()).unwrap_or_default()}
                                </p>
                                <A href=ROUTE_DASHBOARD><span class="btn">"Open Dashboard"</span></A>
                            </div>
                        }.into_any()
                    } else {
                        let buttons = ProviderKind::all()
                            .iter()
                            .map(|&kind| {
                                let installed = available.contains(&kind);
                                view! {
                                    <button
                                        class="btn wallet-option"
                                        disabled=move || !installed || wallet_ctx.connecting.get()
                                        on:click=move |_| wallet_ctx.connect(kind)
                                    >
                                        {kind.name()}
                                        {(!installed).then_some(" (not installed)")}
                                    </button>
                                }
                            })
                            .collect_view();
                        view! { <div class="wallet-options">{buttons}</div> }.into_any()
                    }
                }}

                <Show when=move || wallet_ctx.connecting.get()>
                    <p class="card-subtitle">"Waiting for wallet approval..."</p>
                </Show>
                {move || wallet_ctx.error.get().map(|message| view! { <p class="error-text">{message}</p> })}
            </div>
        </div>
    }
}
