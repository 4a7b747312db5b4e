//! BlockE Wallet Dashboard - Leptos Frontend
//!
//! Routes plus the app-wide wallet overlays (inactivity countdown, network
//! guard, rejection notice, connect toast).

use leptos::prelude::*;
use leptos_router::{
    components::{Route, Router, Routes, A},
    path,
};

use crate::components::{
    AutoDisconnectMonitor, ConnectToast, Navbar, NetworkGuardModal, RejectedOverlay,
};
use crate::pages::{DashboardPage, LandingPage, SettingsPage, StakingPage};
use crate::state::wallet::provide_wallet_context;
use crate::utils::constants::ROUTE_HOME;

#[component]
pub fn App() -> impl IntoView {
    provide_wallet_context();

    view! {
        <Router>
            <div class="app-container">
                <Navbar/>
                <Routes fallback=|| view! { <NotFound/> }>
                    <Route path=path!("/") view=LandingPage/>
                    <Route path=path!("/dashboard") view=DashboardPage/>
                    <Route path=path!("/staking") view=StakingPage/>
                    <Route path=path!("/settings") view=SettingsPage/>
                </Routes>
                // Overlays need the router for navigation and the current route
                <AutoDisconnectMonitor/>
                <NetworkGuardModal/>
                <RejectedOverlay/>
                <ConnectToast/>
            </div>
        </Router>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="app-container" style="display: flex; justify-content: center; align-items: center; min-height: calc(100vh - 60px);">
            <div class="card" style="max-width: 500px; text-align: center;">
                <h1 style="color: #ffffff; margin-bottom: 16px; font-size: 32px; font-weight: 700;">"404 - Page Not Found"</h1>
                <p style="color: #cccccc; margin-bottom: 24px;">"The page you're looking for doesn't exist."</p>
                <A href=ROUTE_HOME>
                    <span class="btn" style="margin-top: 20px; display: inline-block;">
                        "Go to Home"
                    </span>
                </A>
            </div>
        </div>
    }
}
