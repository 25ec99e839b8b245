//! Documentation page endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;

use super::content_type;
use crate::compression::{Content, respond};
use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn get_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let snapshot = state.store.current();
    respond(
        Content::Bytes(snapshot.page().clone()),
        &headers,
        content_type("text/html"),
        &state.encodings,
    )
}
