//! # session-client
//!
//! Leptos + WASM session layer for a single-page application: a session
//! store mirrored to `localStorage`, route guards that redirect on session
//! presence, and an HTTP client that attaches the bearer token and forces a
//! logout when the server answers 401.
//!
//! Browser glue (storage events, `gloo-net`, timers) is gated behind the
//! `hydrate` feature; native builds swap in in-memory stand-ins so the
//! session contract can be exercised with plain `cargo test`.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: installs logging and hydrates the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("console logger unavailable: {e}").into());
    }
    leptos::mount::hydrate_body(app::App);
}
