//! Render error types.

use std::path::PathBuf;

use crate::engine::EngineError;

/// Error returned when a page cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Custom template could not be read.
    #[error("Failed to read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template failed to compile or render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Rendering engine failed.
    #[error("Rendering engine failed: {0}")]
    Engine(#[from] EngineError),

    /// Runtime script is missing from the engine distribution.
    #[error("Runtime script {script} not found in {location}")]
    MissingRuntime {
        script: &'static str,
        location: String,
    },

    /// Page state or options could not be serialized.
    #[error("Failed to serialize page data: {0}")]
    Serialize(#[from] serde_json::Error),
}
