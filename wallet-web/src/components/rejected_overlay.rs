//! "Transaction Rejected" overlay, shown when the user dismisses a wallet prompt.

use leptos::prelude::*;

use crate::state::wallet::use_wallet_context;

#[component]
pub fn RejectedOverlay() -> impl IntoView {
    let ctx = use_wallet_context();

    view! {
        <Show when=move || ctx.rejected.get()>
            <div class="overlay rejected-overlay" role="alertdialog">
                <div class="card">
                    <h2>"Transaction Rejected"</h2>
                    <p>"The request was declined in your wallet. Nothing was changed."</p>
                    <button class="btn" on:click=move |_| ctx.rejected.set(false)>"Dismiss"</button>
                </div>
            </div>
        </Show>
    }
}
