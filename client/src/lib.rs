//! # client
//!
//! Leptos + WASM front end for LawnCare Pro, a lawn-care booking service.
//!
//! This crate holds the account surface: sign-up with a role, sign-in,
//! password reset, a session model shared through context, role-guarded
//! routes and the role-specific dashboard. Accounts and profile rows live in
//! a hosted auth + table backend reached over HTTP (`net::supabase`).
//!
//! The `hydrate` feature builds the browser bundle; `ssr` lets the `server`
//! crate render the same `App` on the server.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod services;
pub mod state;
pub mod util;

/// Browser entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("hydrating LawnCare Pro");
    leptos::mount::hydrate_body(app::App);
}
