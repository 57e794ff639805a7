//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server has no API of its own; accounts and profiles live in the hosted
//! backend the browser talks to directly. This router renders the Leptos app,
//! serves the compiled WASM/CSS bundle under `/pkg`, and answers `/healthz`.


use std::path::{Path, PathBuf};

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("leptos configuration: {0}")]
    LeptosConfig(String),
}

/// Health check plus static assets, independent of the Leptos options.
fn base_routes(site_root: &Path) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .nest_service("/pkg", ServeDir::new(site_root.join("pkg")))
}

/// Full application: SSR routes for every page in `client::app::App`.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[workspace.metadata.leptos]` section without `LEPTOS_*` env).
pub fn app(config: &ServerConfig) -> Result<Router, RouteError> {
    let conf = get_configuration(None).map_err(|e| RouteError::LeptosConfig(e.to_string()))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root = config
        .site_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(leptos_options.site_root.as_ref()));
    tracing::info!(site_root = %site_root.display(), "serving static assets");

    Ok(base_routes(&site_root)
        .merge(leptos_router)
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
