//! Error types for the live server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use specdoc_renderer::RenderError;
use specdoc_spec::SpecLoadError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Specification could not be loaded.
    #[error(transparent)]
    Load(#[from] SpecLoadError),

    /// Page could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Specification could not be serialized for `spec.json`.
    #[error("Failed to serialize specification: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Listener could not be bound.
    #[error("Failed to listen on {addr}: {source}")]
    Listen {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Change watcher could not be started.
    #[error("Failed to watch for changes: {0}")]
    Watch(#[from] notify::Error),

    /// Background render task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
