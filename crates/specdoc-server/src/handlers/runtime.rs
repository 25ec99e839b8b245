//! Runtime script endpoint.

use std::borrow::Cow;
use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use specdoc_assets::{AssetSource, RUNTIME_SCRIPT};

use super::{content_type, not_found};
use crate::compression::{Content, respond};
use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /redoc.standalone.js.
///
/// Files on disk are streamed; embedded files are served from memory.
pub(crate) async fn get_runtime_script(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let content = match state.assets.locate(RUNTIME_SCRIPT) {
        Some(AssetSource::Memory(Cow::Borrowed(data))) => Content::Bytes(Bytes::from_static(data)),
        Some(AssetSource::Memory(Cow::Owned(data))) => Content::Bytes(Bytes::from(data)),
        Some(AssetSource::File(path)) => Content::File(tokio::fs::File::open(path).await?),
        None => return Ok(not_found().await.into_response()),
    };

    Ok(respond(
        content,
        &headers,
        content_type("application/javascript"),
        &state.encodings,
    ))
}
