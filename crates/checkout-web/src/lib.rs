//! Checkout Web Frontend
//!
//! Leptos-based WASM checkout page. Payment buttons come from the hosted
//! PayPal JS SDK; `checkout-core` decides which of them are offered.

mod api;
mod app;
mod components;
mod notices;
mod pages;
mod paypal;

pub use app::App;
pub use paypal::PayPalSdk;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
