//! Landing pages Web Frontend
//!
//! Leptos-based WASM authoring frontend: login, dashboard and the page
//! creation form. Published pages are served by the server under `/lp/`.

mod api;
mod app;
mod components;
mod files;
mod pages;
mod submission;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
