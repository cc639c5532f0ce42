//! # account-client
//!
//! Leptos + WASM frontend for the account-management application: login,
//! dashboard, profile, balance, and account-summary views backed by a
//! REST API with token-based sessions.
//!
//! The interesting part is the session lifecycle: the transport wrapper in
//! `net::http` owns CSRF and bearer headers plus one-shot 401 recovery, the
//! operations in `net::ops` bind API calls to session-store effects, and
//! `state::session` holds the observable session that pages and the route
//! guard react to. Browser-only I/O is gated behind the `hydrate` feature so
//! the protocol logic stays natively testable.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
