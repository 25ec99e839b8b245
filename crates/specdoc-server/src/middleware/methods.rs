//! Method filtering.

use axum::body::Body;
use axum::http::{Method, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::handlers;

/// Pass `GET` requests through and answer everything else with 404.
///
/// axum's `get` routes also accept `HEAD`; the server does not.
pub(crate) async fn get_only(request: Request<Body>, next: Next) -> Response {
    if request.method() != Method::GET {
        return handlers::not_found().await.into_response();
    }
    next.run(request).await
}
