//! # petcare-client
//!
//! Leptos + WASM frontend core for the pet-management dashboard.
//!
//! This crate contains the request pipeline every backend call goes through
//! (`net`), the persisted session store (`state::auth`), the role-gated route
//! table and navigation guard (`router`), and a thin page layer wiring them
//! together. Browser-only glue is gated behind the `csr` feature so the state
//! machines stay testable natively.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod router;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

/// Browser entry point: install panic/log hooks and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
