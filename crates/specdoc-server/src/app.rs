//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn;
use axum::routing::get;
use specdoc_assets::RUNTIME_SCRIPT;
use specdoc_renderer::SPEC_ENDPOINT;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{methods, security};
use crate::state::AppState;

/// Create the application router.
///
/// Paths are matched exactly and only `GET` is answered; anything else,
/// including `HEAD` on known paths, gets the plain-text 404.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::page::get_page))
        .route(
            &format!("/{RUNTIME_SCRIPT}"),
            get(handlers::runtime::get_runtime_script),
        )
        .route(&format!("/{SPEC_ENDPOINT}"), get(handlers::spec::get_spec))
        .route_layer(from_fn(methods::get_only))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::content_type_options_layer()),
        )
        .with_state(state)
}
