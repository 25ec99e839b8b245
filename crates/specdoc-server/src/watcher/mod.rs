//! Change watcher.
//!
//! Watches a local specification file and invokes a callback once per burst
//! of changes.
//!
//! ```text
//! notify callback ──mpsc──► recorder task ──► EventDebouncer ◄── poll task ──► on_change
//! ```
//!
//! The parent directory is watched rather than the file itself so that
//! editors saving through a temporary file and a rename keep being observed.

mod debouncer;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use self::debouncer::EventDebouncer;
use crate::error::ServerError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const CHANNEL_CAPACITY: usize = 100;

/// Kind of change observed on the watched file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChangeKind {
    /// Contents or metadata changed in place.
    Change,
    /// File appeared, disappeared or was renamed.
    Rename,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Change => "change",
            Self::Rename => "rename",
        })
    }
}

/// A filesystem event on the watched file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ChangeEvent {
    pub(crate) kind: ChangeKind,
    pub(crate) path: PathBuf,
}

impl ChangeEvent {
    /// Whether the event should trigger a reload.
    ///
    /// Renames only count while the file exists, which filters out deletes.
    pub(crate) fn should_trigger(&self) -> bool {
        match self.kind {
            ChangeKind::Change => true,
            ChangeKind::Rename => self.path.exists(),
        }
    }
}

/// Watches one file and reports debounced changes.
pub(crate) struct ChangeWatcher {
    target: PathBuf,
    window: Duration,
    watcher: Option<RecommendedWatcher>,
    tasks: Vec<JoinHandle<()>>,
}

impl ChangeWatcher {
    /// Create a watcher for `path` with the given debounce window.
    ///
    /// Fails if `path` does not exist.
    pub(crate) fn new(path: &Path, window: Duration) -> Result<Self, ServerError> {
        Ok(Self {
            target: path.canonicalize()?,
            window,
            watcher: None,
            tasks: Vec::new(),
        })
    }

    /// Start watching.
    ///
    /// `on_change` runs on the polling task and must not block; it is called
    /// at most once per debounce window.
    pub(crate) fn start<F>(&mut self, on_change: F) -> Result<(), ServerError>
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Event>(CHANNEL_CAPACITY);

        let mut watcher =
            notify::recommended_watcher(move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    // Use blocking_send since callback is sync
                    let _ = tx.blocking_send(event);
                }
                Err(e) => tracing::warn!(error = %e, "File watcher error"),
            })?;
        let dir = self.target.parent().unwrap_or(&self.target);
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        self.watcher = Some(watcher);

        let debouncer = Arc::new(EventDebouncer::new(self.window));

        let recorder = Arc::clone(&debouncer);
        let target = self.target.clone();
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Some(change) = classify(&event, &target) {
                    tracing::debug!(
                        path = %change.path.display(),
                        kind = %change.kind,
                        "Recorded filesystem event"
                    );
                    recorder.record(change);
                }
            }
        }));

        self.tasks.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            loop {
                interval.tick().await;

                let Some(event) = debouncer.drain_ready() else {
                    continue;
                };
                if event.should_trigger() {
                    tracing::info!("{}: {}", event.kind, event.path.display());
                    on_change(event);
                } else {
                    tracing::debug!(path = %event.path.display(), "File is gone, skipping reload");
                }
            }
        }));

        tracing::info!("Watching {} for changes...", self.target.display());
        Ok(())
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.watcher.take();
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Map a raw notify event to a change on `target`.
fn classify(event: &Event, target: &Path) -> Option<ChangeEvent> {
    let kind = match event.kind {
        EventKind::Modify(ModifyKind::Name(_)) | EventKind::Create(_) | EventKind::Remove(_) => {
            ChangeKind::Rename
        }
        EventKind::Modify(_) => ChangeKind::Change,
        _ => return None,
    };

    event.paths.iter().any(|p| p == target).then(|| ChangeEvent {
        kind,
        path: target.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind, RenameMode};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn raw(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_classify_kinds() {
        let target = Path::new("/specs/petstore.yaml");

        let data = raw(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/specs/petstore.yaml",
        );
        assert_eq!(classify(&data, target).map(|e| e.kind), Some(ChangeKind::Change));

        let renamed = raw(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            "/specs/petstore.yaml",
        );
        assert_eq!(classify(&renamed, target).map(|e| e.kind), Some(ChangeKind::Rename));

        let created = raw(EventKind::Create(CreateKind::File), "/specs/petstore.yaml");
        assert_eq!(classify(&created, target).map(|e| e.kind), Some(ChangeKind::Rename));

        let removed = raw(EventKind::Remove(RemoveKind::File), "/specs/petstore.yaml");
        assert_eq!(classify(&removed, target).map(|e| e.kind), Some(ChangeKind::Rename));

        let accessed = raw(EventKind::Access(AccessKind::Read), "/specs/petstore.yaml");
        assert_eq!(classify(&accessed, target), None);
    }

    #[test]
    fn test_classify_ignores_siblings() {
        let target = Path::new("/specs/petstore.yaml");
        let sibling = raw(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/specs/.petstore.yaml.swp",
        );

        assert_eq!(classify(&sibling, target), None);
    }

    #[test]
    fn test_rename_triggers_only_while_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("petstore.yaml");
        std::fs::write(&present, "openapi: 3.0.3").unwrap();
        let missing = dir.path().join("deleted.yaml");

        let rename = |path: &Path| ChangeEvent {
            kind: ChangeKind::Rename,
            path: path.to_path_buf(),
        };
        assert!(rename(&present).should_trigger());
        assert!(!rename(&missing).should_trigger());

        let change = ChangeEvent {
            kind: ChangeKind::Change,
            path: missing,
        };
        assert!(change.should_trigger());
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ChangeWatcher::new(&dir.path().join("missing.yaml"), Duration::from_secs(2));

        assert!(matches!(result, Err(ServerError::Io(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_burst_of_writes_triggers_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("petstore.yaml");
        std::fs::write(&path, "openapi: 3.0.3").unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut watcher = ChangeWatcher::new(&path, Duration::from_millis(300)).unwrap();
        watcher
            .start(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        for i in 0..5 {
            std::fs::write(&path, format!("openapi: 3.0.3\n# edit {i}\n")).unwrap();
        }
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
