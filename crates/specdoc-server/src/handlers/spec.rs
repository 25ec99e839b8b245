//! Specification endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;

use super::content_type;
use crate::compression::{Content, respond};
use crate::state::AppState;

/// Handle GET /spec.json.
///
/// Serves the specification from the same snapshot as the current page.
pub(crate) async fn get_spec(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let snapshot = state.store.current();
    respond(
        Content::Bytes(snapshot.spec_json().clone()),
        &headers,
        content_type("application/json"),
        &state.encodings,
    )
}
