//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use specdoc_assets::EngineAssets;
use specdoc_spec::Specification;

use crate::compression::Encoding;

/// Result of one render cycle.
///
/// The specification, its JSON form and the page are always from the same
/// cycle.
#[derive(Debug)]
pub struct Snapshot {
    sequence: u64,
    spec: Specification,
    spec_json: Bytes,
    page: Bytes,
}

impl Snapshot {
    pub(crate) fn new(sequence: u64, spec: Specification, spec_json: Bytes, page: Bytes) -> Self {
        Self {
            sequence,
            spec,
            spec_json,
            page,
        }
    }

    /// Reload sequence number that produced this snapshot (`0` at startup).
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Loaded specification.
    #[must_use]
    pub fn spec(&self) -> &Specification {
        &self.spec
    }

    /// Specification as pretty-printed JSON.
    #[must_use]
    pub fn spec_json(&self) -> &Bytes {
        &self.spec_json
    }

    /// Rendered HTML page.
    #[must_use]
    pub fn page(&self) -> &Bytes {
        &self.page
    }
}

/// Holder of the current [`Snapshot`].
///
/// Readers clone the `Arc` and release the lock at once; writers replace the
/// whole snapshot. A half-updated page is never observable.
#[derive(Debug)]
pub struct PageStore {
    current: RwLock<Arc<Snapshot>>,
}

impl PageStore {
    pub(crate) fn new(initial: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Get the current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the current snapshot unless a newer one is already published.
    ///
    /// Returns `true` if `snapshot` became current.
    pub(crate) fn publish(&self, snapshot: Snapshot) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if snapshot.sequence <= current.sequence {
            return false;
        }
        *current = Arc::new(snapshot);
        true
    }
}

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Current page and specification.
    pub(crate) store: Arc<PageStore>,
    /// Engine distribution serving the runtime script.
    pub(crate) assets: EngineAssets,
    /// Encodings in preference order.
    pub(crate) encodings: Vec<Encoding>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(sequence: u64, title: &str) -> Snapshot {
        let spec =
            Specification::from_value(json!({"info": {"title": title}}), "test.json").unwrap();
        Snapshot::new(
            sequence,
            spec,
            Bytes::from(format!("{{\"title\":\"{title}\"}}")),
            Bytes::from(format!("<title>{title}</title>")),
        )
    }

    #[test]
    fn test_publish_newer_snapshot() {
        let store = PageStore::new(snapshot(0, "v0"));

        assert!(store.publish(snapshot(1, "v1")));

        let current = store.current();
        assert_eq!(current.sequence(), 1);
        assert_eq!(current.page(), &Bytes::from("<title>v1</title>"));
        assert_eq!(current.spec().title(), Some("v1"));
    }

    #[test]
    fn test_publish_rejects_stale_snapshot() {
        let store = PageStore::new(snapshot(0, "v0"));
        assert!(store.publish(snapshot(3, "v3")));

        assert!(!store.publish(snapshot(2, "v2")));
        assert!(!store.publish(snapshot(3, "v3-again")));

        assert_eq!(store.current().page(), &Bytes::from("<title>v3</title>"));
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let store = PageStore::new(snapshot(0, "v0"));
        let held = store.current();

        store.publish(snapshot(1, "v1"));

        assert_eq!(held.page(), &Bytes::from("<title>v0</title>"));
        assert_eq!(held.spec().title(), Some("v0"));
        assert_eq!(store.current().sequence(), 1);
    }
}
