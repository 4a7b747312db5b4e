//! Dashboard Page - connected wallet details
//!
//! Requires Ethereum mainnet (enforced by the network guard).

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use lib_utils::time::format_time;

use crate::state::wallet::use_wallet_context;
use crate::utils::constants::{OWNERSHIP_MESSAGE, ROUTE_HOME};
use crate::utils::format::{format_network, format_signature};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let wallet_ctx = use_wallet_context();
    let navigate = use_navigate();
    let signature = RwSignal::new(None::<String>);
    let signing = RwSignal::new(false);

    let on_disconnect = move |_| {
        wallet_ctx.disconnect();
        navigate(ROUTE_HOME, Default::default());
    };

    let on_sign = move |_| {
        let Some(signer) = wallet_ctx.session().signer() else {
            return;
        };
        signing.set(true);
        leptos::task::spawn_local(async move {
            match signer.sign_message(OWNERSHIP_MESSAGE).await {
                Ok(sig) => signature.set(Some(sig)),
                Err(e) => wallet_ctx.report_error(&e),
            }
            signing.set(false);
        });
    };

    view! {
        <div class="app-container page-centered">
            <div class="card" style="width: 100%; max-width: 560px;">
                <h1 class="card-title">"Dashboard"</h1>

                {move || {
                    let disconnect = on_disconnect.clone();
                    if wallet_ctx.is_connected() {
                        let snapshot = wallet_ctx.wallet.get();
                        let since = wallet_ctx
                            .session()
                            .connected_at()
                            .map(format_time)
                            .unwrap_or_default();
                        view! {
                            <div>
                                <dl class="detail-list">
                                    <dt>"Wallet"</dt>
                                    <dd>{snapshot.provider.map(|kind| kind.name()).unwrap_or_default()}</dd>
                                    <dt>"Address"</dt>
                                    <dd class="mono">{snapshot.address.map(|a| a.to_string()).unwrap_or_default()}</dd>
                                    <dt>"Network"</dt>
                                    <dd>{format_network(snapshot.chain_id)}</dd>
                                    <dt>"Connected since"</dt>
                                    <dd>{since}</dd>
                                </dl>

                                <button class="btn" on:click=on_sign disabled=move || signing.get()>
                                    "Verify ownership"
                                </button>
                                {move || signature.get().map(|sig| view! {
                                    <p class="mono">"Signature: " {format_signature(&sig)}</p>
                                })}

                                <button class="btn btn-secondary" on:click=disconnect>
                                    "Disconnect Wallet"
                                </button>
                            </div>
                        }.into_any()
                    } else {
                        view! {
                            <div>
                                <p class="card-subtitle">"No wallet connected"</p>
                                <a href=ROUTE_HOME class="btn">"Connect Wallet"</a>
                            </div>
                        }.into_any()
                    }
                }}
            </div>
        </div>
    }
}
