//! Network Guard Modal
//!
//! Blocks pages whose required chain differs from the wallet's chain and
//! offers a one-click switch. Re-checks whenever the route or the session's
//! chain changes.

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use lib_core::{GuardStatus, WalletError};

use crate::state::wallet::use_wallet_context;
use crate::utils::format::format_network_mismatch;

#[component]
pub fn NetworkGuardModal() -> impl IntoView {
    let ctx = use_wallet_context();
    let pathname = use_location().pathname;
    let status = RwSignal::new(GuardStatus::NoRequirement);
    let switching = RwSignal::new(false);
    let message = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        let route = pathname.get();
        // Track connection and chain so wallet-side switches re-run the check
        ctx.wallet.with(|state| (state.connected, state.chain_id));

        let guard = ctx.guard();
        leptos::task::spawn_local(async move {
            let result = guard.check(&route).await;
            // The user may have navigated on while the wallet answered
            if pathname.get_untracked() != route {
                return;
            }
            match result {
                Ok(current) => {
                    status.set(current);
                    if !current.is_mismatch() {
                        message.set(None);
                    }
                }
                Err(e) => log::warn!("Network check failed on {}: {}", route, e),
            }
        });
    });

    let switch = move |_| {
        let route = pathname.get_untracked();
        let guard = ctx.guard();
        switching.set(true);
        message.set(None);
        leptos::task::spawn_local(async move {
            let result = guard.switch(&route).await;
            switching.set(false);
            if pathname.get_untracked() != route {
                return;
            }
            match result {
                Ok(current) => status.set(current),
                Err(WalletError::UnknownChain(chain)) => message.set(Some(format!(
                    "{} is not configured in your wallet. Add it from the wallet's network settings, then try again.",
                    chain.label()
                ))),
                Err(e) if e.is_user_rejection() => {
                    message.set(Some("Network switch was declined.".to_string()))
                }
                Err(e) => message.set(Some(e.user_message())),
            }
        });
    };

    view! {
        {move || match status.get() {
            GuardStatus::Mismatch { required, current } => Some(view! {
                <div class="overlay network-guard-overlay" role="dialog" aria-modal="true">
                    <div class="card">
                        <h2>"Wrong network"</h2>
                        <p>{format_network_mismatch(required, current)}</p>
                        {move || message.get().map(|text| view! { <p class="error-text">{text}</p> })}
                        <button class="btn" on:click=switch disabled=move || switching.get()>
                            {move || if switching.get() {
                                "Switching...".to_string()
                            } else {
                                format!("Switch to {}", required.label())
                            }}
                        </button>
                    </div>
                </div>
            }),
            _ => None,
        }}
    }
}
