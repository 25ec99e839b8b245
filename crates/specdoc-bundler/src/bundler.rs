//! Static bundler.
//!
//! Loads a specification once, pre-renders it and writes a single HTML file
//! that works without a server.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use specdoc_renderer::{PageRenderer, RenderError, RenderOptions};
use specdoc_spec::{SpecLoadError, SpecLoader, SpecSource};

/// Configuration for a bundle run.
#[derive(Clone, Debug)]
pub struct BundleConfig {
    /// Where the specification is read from.
    pub source: SpecSource,
    /// Output file; missing parent directories are created.
    pub output: PathBuf,
    /// Rendering options. Server-side rendering is always enabled.
    pub render: RenderOptions,
}

/// Error returned by the bundler.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error(transparent)]
    Load(#[from] SpecLoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a successful bundle run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleReport {
    /// File that was written.
    pub output: PathBuf,
    /// Size of the written page in bytes.
    pub bytes: usize,
}

/// Writes pre-rendered documentation pages to disk.
pub struct StaticBundler {
    loader: Arc<dyn SpecLoader>,
    renderer: PageRenderer,
}

impl StaticBundler {
    /// Create a bundler.
    #[must_use]
    pub fn new(loader: Arc<dyn SpecLoader>, renderer: PageRenderer) -> Self {
        Self { loader, renderer }
    }

    /// Load, render and write the page described by `config`.
    pub fn bundle(&self, config: &BundleConfig) -> Result<BundleReport, BundleError> {
        let start = Instant::now();
        let spec = self.loader.load(&config.source)?;

        let options = RenderOptions {
            server_side_render: true,
            ..config.render.clone()
        };
        let page = self.renderer.render(&spec, &config.source, &options)?;

        write_page(&config.output, page.html())?;

        tracing::info!(
            output = %config.output.display(),
            bytes = page.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Bundle written"
        );
        Ok(BundleReport {
            output: config.output.clone(),
            bytes: page.len(),
        })
    }
}

fn write_page(path: &Path, html: &str) -> Result<(), BundleError> {
    let write_error = |source| BundleError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, html).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use specdoc_assets::{CDN_RUNTIME_URL, EngineAssets, RUNTIME_SCRIPT};
    use specdoc_spec::MockLoader;

    const RUNTIME: &str = "window.Redoc = {hydrate: function () {}};";

    fn petstore() -> serde_json::Value {
        json!({
            "openapi": "3.0.3",
            "info": {"title": "Petstore", "version": "1.0.0"},
            "paths": {"/pets": {"get": {"operationId": "listPets"}}}
        })
    }

    fn bundler(assets_dir: &Path, loader: Arc<MockLoader>) -> StaticBundler {
        fs::write(assets_dir.join(RUNTIME_SCRIPT), RUNTIME).unwrap();
        StaticBundler::new(loader, PageRenderer::new(EngineAssets::from_dir(assets_dir)))
    }

    fn config(output: PathBuf) -> BundleConfig {
        BundleConfig {
            source: SpecSource::parse("petstore.json"),
            output,
            render: RenderOptions::default(),
        }
    }

    #[test]
    fn test_bundle_writes_pre_rendered_page() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Arc::new(MockLoader::new(petstore()));
        let output = dir.path().join("redoc-static.html");

        let mut config = config(output.clone());
        config.render.page_title = "Petstore API".to_owned();
        let report = bundler(dir.path(), loader).bundle(&config).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert_eq!(report, BundleReport { output, bytes: html.len() });
        assert!(html.contains("<title>Petstore API</title>"));
        assert!(html.contains(&format!("<script>{RUNTIME}</script>")));
        assert!(html.contains("const __redoc_state = "));
        assert!(html.contains("id=\"operation/listPets\""));
    }

    #[test]
    fn test_bundle_forces_server_side_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Arc::new(MockLoader::new(petstore()));
        let output = dir.path().join("out.html");

        let mut config = config(output.clone());
        config.render.server_side_render = false;
        bundler(dir.path(), loader).bundle(&config).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("Redoc.hydrate(__redoc_state, container);"));
        assert!(!html.contains("Redoc.init("));
    }

    #[test]
    fn test_bundle_with_cdn_references_remote_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Arc::new(MockLoader::new(petstore()));
        let output = dir.path().join("out.html");

        let mut config = config(output.clone());
        config.render.use_cdn = true;
        bundler(dir.path(), loader).bundle(&config).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains(&format!("<script src=\"{CDN_RUNTIME_URL}\"></script>")));
        assert!(!html.contains(RUNTIME));
    }

    #[test]
    fn test_bundle_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Arc::new(MockLoader::new(petstore()));
        let output = dir.path().join("docs/api/index.html");

        bundler(dir.path(), loader).bundle(&config(output.clone())).unwrap();

        assert!(output.is_file());
    }

    #[test]
    fn test_load_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Arc::new(MockLoader::new(petstore()));
        loader.fail_with("unexpected end of input");
        let output = dir.path().join("out.html");

        let err = bundler(dir.path(), loader).bundle(&config(output.clone())).unwrap_err();

        assert!(matches!(err, BundleError::Load(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_unwritable_output_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Arc::new(MockLoader::new(petstore()));
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = bundler(dir.path(), loader)
            .bundle(&config(blocker.join("out.html")))
            .unwrap_err();

        assert!(matches!(err, BundleError::Write { .. }));
    }
}
