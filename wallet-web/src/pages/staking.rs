//! Staking Page - Sepolia testnet only

use leptos::prelude::*;
use shared::ChainId;

use crate::state::wallet::use_wallet_context;
use crate::utils::constants::ROUTE_STAKING;

#[component]
pub fn StakingPage() -> impl IntoView {
    let wallet_ctx = use_wallet_context();
    let required = wallet_ctx
        .guard()
        .required_chain(ROUTE_STAKING)
        .unwrap_or(ChainId::SEPOLIA);

    view! {
        <div class="app-container page-centered">
            <div class="card" style="width: 100%; max-width: 560px;">
                <h1 class="card-title">"Staking"</h1>
                <p class="card-subtitle">
                    "Staking runs on " {required.label()} ". Test funds only."
                </p>
                <Show
                    when=move || wallet_ctx.is_connected()
                    fallback=|| view! { <p>"Connect a wallet to stake."</p> }
                >
                    <p>
                        "Staking from "
                        {move || wallet_ctx.wallet.with(|state| state.short_address()).unwrap_or_default()}
                    </p>
                </Show>
            </div>
        </div>
    }
}
