//! Rendering engine abstraction.
//!
//! An engine turns a specification into static markup plus a serializable
//! state blob that the browser runtime hydrates.

use serde_json::{Map, Value};
use specdoc_spec::Specification;

/// Error raised by a rendering engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Engine rejected the document.
    #[error("{0}")]
    Failed(String),

    /// State could not be serialized.
    #[error("Failed to serialize state: {0}")]
    State(#[from] serde_json::Error),
}

/// Engine input for one render cycle.
#[derive(Debug)]
pub struct RenderStore<'a> {
    spec: &'a Specification,
    spec_url: Option<String>,
    options: &'a Map<String, Value>,
}

impl<'a> RenderStore<'a> {
    /// Create a store from a specification and engine options.
    #[must_use]
    pub fn new(
        spec: &'a Specification,
        spec_url: Option<String>,
        options: &'a Map<String, Value>,
    ) -> Self {
        Self {
            spec,
            spec_url,
            options,
        }
    }

    /// Specification being rendered.
    #[must_use]
    pub fn spec(&self) -> &Specification {
        self.spec
    }

    /// URL the page advertises for downloading the specification.
    #[must_use]
    pub fn spec_url(&self) -> Option<&str> {
        self.spec_url.as_deref()
    }

    /// Engine options.
    #[must_use]
    pub fn options(&self) -> &Map<String, Value> {
        self.options
    }

    /// Whether a boolean engine option is set to `true`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.options
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Static output of an engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup {
    /// Pre-rendered body markup.
    pub html: String,
    /// Stylesheet the markup depends on.
    pub styles: String,
}

/// Produces markup and hydration state for a specification.
///
/// Implementations must be deterministic: the same store yields the same
/// markup and state.
pub trait RenderEngine: Send + Sync {
    /// Build the engine store.
    fn create_store<'a>(
        &self,
        spec: &'a Specification,
        spec_url: Option<&str>,
        options: &'a Map<String, Value>,
    ) -> Result<RenderStore<'a>, EngineError> {
        Ok(RenderStore::new(spec, spec_url.map(str::to_owned), options))
    }

    /// Render static markup and styles for the store.
    fn render_markup(&self, store: &RenderStore<'_>) -> Result<Markup, EngineError>;

    /// Serialize the store into the state the runtime hydrates.
    fn serialize_state(&self, store: &RenderStore<'_>) -> Result<Value, EngineError>;
}
