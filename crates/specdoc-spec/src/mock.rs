//! Mock loader for testing.
//!
//! Provides [`MockLoader`] for unit testing without filesystem or network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use crate::{SpecLoadError, SpecLoader, SpecSource, Specification};

/// Loader that returns a configurable in-memory document.
///
/// # Example
///
/// ```ignore
/// use serde_json::json;
/// use specdoc_spec::{MockLoader, SpecLoader, SpecSource};
///
/// let loader = MockLoader::new(json!({"openapi": "3.0.0"}));
/// let spec = loader.load(&SpecSource::parse("openapi.json"))?;
///
/// loader.fail_with("unexpected end of input");
/// assert!(loader.load(&SpecSource::parse("openapi.json")).is_err());
/// ```
#[derive(Debug)]
pub struct MockLoader {
    current: Mutex<Result<Value, String>>,
    calls: AtomicUsize,
}

impl MockLoader {
    /// Create a loader that returns `document`.
    #[must_use]
    pub fn new(document: Value) -> Self {
        Self {
            current: Mutex::new(Ok(document)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Return `document` from subsequent loads.
    pub fn set_document(&self, document: Value) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Ok(document);
    }

    /// Fail subsequent loads with a parse error carrying `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Err(message.into());
    }

    /// Number of `load` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SpecLoader for MockLoader {
    fn load(&self, source: &SpecSource) -> Result<Specification, SpecLoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match current {
            Ok(document) => Specification::from_value(document, &source.to_string()),
            Err(message) => Err(SpecLoadError::Parse {
                origin: source.to_string(),
                message,
            }),
        }
    }
}
