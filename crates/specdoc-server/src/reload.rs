//! Render cycles and snapshot publishing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use bytes::Bytes;
use specdoc_renderer::{PageRenderer, RenderOptions};
use specdoc_spec::{SpecLoader, SpecSource};
use tokio::task::JoinHandle;

use crate::error::ServerError;
use crate::state::{PageStore, Snapshot};

/// What happened to a finished render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReloadOutcome {
    /// Snapshot became current.
    Published,
    /// A newer reload had already published; snapshot dropped.
    Superseded,
}

/// Everything one render cycle needs.
struct Pipeline {
    loader: Arc<dyn SpecLoader>,
    renderer: PageRenderer,
    source: SpecSource,
    options: RenderOptions,
}

impl Pipeline {
    /// Load and render synchronously.
    fn run(&self, sequence: u64) -> Result<Snapshot, ServerError> {
        let spec = self.loader.load(&self.source)?;
        let page = self.renderer.render(&spec, &self.source, &self.options)?;
        let spec_json = spec.to_pretty_json()?;
        Ok(Snapshot::new(
            sequence,
            spec,
            Bytes::from(spec_json),
            Bytes::from(page.into_string()),
        ))
    }
}

/// Runs render cycles and publishes their results into a [`PageStore`].
///
/// Reloads are numbered when triggered. Renders are never cancelled; when two
/// overlap, the one triggered last wins regardless of finishing order.
pub(crate) struct Reloader {
    pipeline: Arc<Pipeline>,
    store: Arc<PageStore>,
    sequence: AtomicU64,
}

impl Reloader {
    /// Perform the initial render cycle.
    ///
    /// Fails if the specification cannot be loaded or rendered.
    pub(crate) async fn start(
        loader: Arc<dyn SpecLoader>,
        renderer: PageRenderer,
        source: SpecSource,
        options: RenderOptions,
    ) -> Result<Self, ServerError> {
        let pipeline = Arc::new(Pipeline {
            loader,
            renderer,
            source,
            options,
        });
        let initial = run_blocking(Arc::clone(&pipeline), 0).await?;

        Ok(Self {
            pipeline,
            store: Arc::new(PageStore::new(initial)),
            sequence: AtomicU64::new(0),
        })
    }

    /// Store holding the current snapshot.
    pub(crate) fn store(&self) -> &Arc<PageStore> {
        &self.store
    }

    /// Allocate the next reload sequence number.
    pub(crate) fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Run one render cycle numbered `sequence` and try to publish it.
    ///
    /// On error the current snapshot is left untouched.
    pub(crate) async fn reload(&self, sequence: u64) -> Result<ReloadOutcome, ServerError> {
        let start = Instant::now();
        let snapshot = run_blocking(Arc::clone(&self.pipeline), sequence).await?;

        let outcome = if self.store.publish(snapshot) {
            ReloadOutcome::Published
        } else {
            ReloadOutcome::Superseded
        };
        tracing::debug!(
            sequence,
            ?outcome,
            elapsed_ms = start.elapsed().as_millis(),
            "Render cycle finished"
        );
        Ok(outcome)
    }

    /// Number a reload now and run it in the background.
    ///
    /// Failures are logged; the previous page keeps being served.
    pub(crate) fn spawn_reload(self: &Arc<Self>) -> JoinHandle<()> {
        let sequence = self.next_sequence();
        let reloader = Arc::clone(self);

        tokio::spawn(async move {
            match reloader.reload(sequence).await {
                Ok(ReloadOutcome::Published) => tracing::info!(sequence, "Updated successfully"),
                Ok(ReloadOutcome::Superseded) => {
                    tracing::debug!(sequence, "Discarded render superseded by a newer reload");
                }
                Err(e) => {
                    tracing::error!(sequence, error = %e, "Reload failed, keeping previous page");
                }
            }
        })
    }
}

async fn run_blocking(pipeline: Arc<Pipeline>, sequence: u64) -> Result<Snapshot, ServerError> {
    tokio::task::spawn_blocking(move || pipeline.run(sequence)).await?
}
