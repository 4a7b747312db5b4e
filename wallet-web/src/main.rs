//! BlockE Wallet Dashboard
//!
//! Browser front-end for the wallet session in `lib-core`: connect an
//! injected EVM wallet, keep it on the right network per page, and
//! disconnect it after a period of inactivity.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

mod app;
mod components;
mod pages;
mod services;
mod state;
pub mod utils;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Initialize logger
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("{} starting...", utils::constants::APP_NAME);

    hide_loading_screen();

    leptos::mount::mount_to_body(|| view! { <App/> });
}

/// Hide the static loading screen shipped in index.html
fn hide_loading_screen() {
    let Some(loading_element) = gloo_utils::document().get_element_by_id("leptos-loading") else {
        log::warn!("Loading element not found");
        return;
    };

    if let Some(html_element) = loading_element.dyn_ref::<HtmlElement>() {
        if let Err(e) = html_element.class_list().add_1("hidden") {
            log::warn!("Failed to hide loading screen: {:?}", e);
        }
    }
    loading_element
        .set_attribute("style", "display: none !important;")
        .ok();
}
