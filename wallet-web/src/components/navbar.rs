//! Navigation Bar Component

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::wallet::use_wallet_context;
use crate::utils::constants::{APP_NAME, ROUTE_DASHBOARD, ROUTE_HOME, ROUTE_SETTINGS, ROUTE_STAKING};
use crate::utils::format::format_network;

#[component]
pub fn Navbar() -> impl IntoView {
    let ctx = use_wallet_context();

    let network_class = move || {
        if ctx.wallet.with(|state| state.correct_network) {
            "network-badge"
        } else {
            "network-badge network-badge-warning"
        }
    };

    view! {
        <nav>
            <div class="nav-inner">
                <A href=ROUTE_HOME>
                    <span class="nav-title">{APP_NAME}</span>
                </A>
                <A href=ROUTE_DASHBOARD><span class="nav-link">"Dashboard"</span></A>
                <A href=ROUTE_STAKING><span class="nav-link">"Staking"</span></A>
                <A href=ROUTE_SETTINGS><span class="nav-link">"Settings"</span></A>

                <div class="nav-wallet">
                    <Show
                        when=move || ctx.is_connected()
                        fallback=|| view! {
                            <A href=ROUTE_HOME><span class="btn">"Connect Wallet"</span></A>
                        }
                    >
                        <span class=network_class>
                            {move || format_network(ctx.wallet.with(|state| state.chain_id))}
                        </span>
                        <Show when=move || !ctx.wallet.with(|state| state.correct_network)>
                            <button class="btn btn-small" on:click=move |_| ctx.switch_network()>
                                "Switch"
                            </button>
                        </Show>
                        <span class="nav-address">
                            {move || ctx.wallet.with(|state| state.short_address()).unwrap_or_default()}
                        </span>
                        <label class="nav-toggle" title="Disconnect after 5 minutes of inactivity">
                            <input
                                type="checkbox"
                                prop:checked=move || ctx.auto_disconnect_enabled.get()
                                on:change=move |ev| ctx.set_auto_disconnect(event_target_checked(&ev))
                            />
                            "Auto-disconnect"
                        </label>
                        <button class="btn btn-secondary" on:click=move |_| ctx.disconnect()>
                            "Disconnect"
                        </button>
                    </Show>
                </div>
            </div>
        </nav>
    }
}
