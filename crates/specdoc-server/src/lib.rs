//! Live documentation server for specdoc.
//!
//! Serves one rendered documentation page, its specification and the
//! runtime script, and optionally re-renders when the specification file
//! changes.
//!
//! # Routes
//!
//! | Path | Content |
//! |------|---------|
//! | `/` | Current page (`text/html`) |
//! | `/redoc.standalone.js` | Runtime script (`application/javascript`) |
//! | `/spec.json` | Current specification, pretty-printed (`application/json`) |
//!
//! Every other path or method gets `404 Not found`. Bodies are compressed
//! when the client accepts `deflate` or `gzip`.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use specdoc_assets::EngineAssets;
//! use specdoc_renderer::PageRenderer;
//! use specdoc_server::{ServerConfig, run_server};
//! use specdoc_spec::{DocumentLoader, SpecSource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         watch: true,
//!         ..ServerConfig::new(SpecSource::parse("openapi.yaml"))
//!     };
//!     let renderer = PageRenderer::new(EngineAssets::default());
//!
//!     run_server(config, Arc::new(DocumentLoader::default()), renderer)
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router ──► PageStore (RwLock<Arc<Snapshot>>)
//!                                        ▲
//!                                        │ publish (highest sequence wins)
//!                                        │
//! notify ──► ChangeWatcher ──► Reloader ──► spawn_blocking(load + render)
//! ```

mod app;
mod compression;
mod error;
mod handlers;
mod middleware;
mod reload;
mod state;
mod watcher;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use specdoc_assets::EngineAssets;
use specdoc_renderer::{PageRenderer, RenderOptions};
use specdoc_spec::{SpecLoader, SpecSource};
use tokio::net::TcpListener;

pub use compression::{Encoding, UnknownEncoding};
pub use error::ServerError;
pub use state::{PageStore, Snapshot};

use reload::Reloader;
use state::AppState;
use watcher::ChangeWatcher;

/// Default debounce window for file changes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Specification to serve.
    pub source: SpecSource,
    /// Options for every render cycle.
    pub render: RenderOptions,
    /// Re-render when the specification file changes.
    pub watch: bool,
    /// Quiet period before a change triggers a re-render.
    pub debounce: Duration,
    /// Encodings in preference order.
    pub compression: Vec<Encoding>,
}

impl ServerConfig {
    /// Configuration with defaults for serving `source`.
    #[must_use]
    pub fn new(source: SpecSource) -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            source,
            render: RenderOptions::default(),
            watch: false,
            debounce: DEFAULT_DEBOUNCE,
            compression: Encoding::DEFAULT_ORDER.to_vec(),
        }
    }
}

/// Server with its first page rendered, not yet listening.
pub struct LiveServer {
    config: ServerConfig,
    reloader: Arc<Reloader>,
    assets: EngineAssets,
}

impl LiveServer {
    /// Run the initial render cycle.
    ///
    /// Fails if the specification cannot be loaded or rendered; nothing is
    /// listening at that point.
    pub async fn start(
        config: ServerConfig,
        loader: Arc<dyn SpecLoader>,
        renderer: PageRenderer,
    ) -> Result<Self, ServerError> {
        let assets = renderer.assets().clone();
        let reloader = Reloader::start(
            loader,
            renderer,
            config.source.clone(),
            config.render.clone(),
        )
        .await?;

        Ok(Self {
            config,
            reloader: Arc::new(reloader),
            assets,
        })
    }

    /// Store holding the page currently served.
    #[must_use]
    pub fn store(&self) -> Arc<PageStore> {
        Arc::clone(self.reloader.store())
    }

    /// Router serving the current snapshot.
    #[must_use]
    pub fn router(&self) -> Router {
        app::create_router(Arc::new(AppState {
            store: self.store(),
            assets: self.assets.clone(),
            encodings: self.config.compression.clone(),
        }))
    }

    /// Bind the listener and start watching for changes.
    pub async fn listen(self) -> Result<ListeningServer, ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Listen { addr, source })?;
        let watcher = self.start_watcher()?;

        Ok(ListeningServer {
            listener,
            router: self.router(),
            watcher,
        })
    }

    fn start_watcher(&self) -> Result<Option<ChangeWatcher>, ServerError> {
        if !self.config.watch {
            return Ok(None);
        }
        let Some(path) = self.config.source.as_path() else {
            tracing::warn!(source = %self.config.source, "Only local files can be watched");
            return Ok(None);
        };
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "Not a file, changes will not be watched");
            return Ok(None);
        }

        let mut watcher = ChangeWatcher::new(path, self.config.debounce)?;
        let reloader = Arc::clone(&self.reloader);
        watcher.start(move |_| drop(reloader.spawn_reload()))?;
        Ok(Some(watcher))
    }
}

/// Server bound to its address.
pub struct ListeningServer {
    listener: TcpListener,
    router: Router,
    watcher: Option<ChangeWatcher>,
}

impl ListeningServer {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests until Ctrl-C.
    pub async fn serve(self) -> Result<(), ServerError> {
        let Self {
            listener,
            router,
            watcher,
        } = self;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        drop(watcher);
        Ok(())
    }
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the initial render fails or the listener cannot be
/// bound. Failed reloads are logged and do not stop the server.
pub async fn run_server(
    config: ServerConfig,
    loader: Arc<dyn SpecLoader>,
    renderer: PageRenderer,
) -> Result<(), ServerError> {
    let server = LiveServer::start(config, loader, renderer)
        .await?
        .listen()
        .await?;
    tracing::info!(address = %server.local_addr()?, "Starting server");
    server.serve().await
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_compression::tokio::bufread::{GzipDecoder, ZlibDecoder};
    use axum::body::Body;
    use axum::http::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE};
    use axum::http::{Method, Request, StatusCode};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use specdoc_assets::RUNTIME_SCRIPT;
    use specdoc_spec::{DocumentLoader, MockLoader};
    use tokio::io::AsyncReadExt;
    use tower::ServiceExt;

    const RUNTIME: &str = "window.Redoc = {hydrate: function () {}, init: function () {}};";

    fn doc(title: &str) -> Value {
        json!({
            "openapi": "3.0.3",
            "info": {"title": title, "version": "1.0.0"},
            "paths": {"/pets": {"get": {"operationId": "listPets"}}}
        })
    }

    struct Fixture {
        dir: tempfile::TempDir,
        loader: Arc<MockLoader>,
        server: LiveServer,
    }

    async fn fixture(ssr: bool) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RUNTIME_SCRIPT), RUNTIME).unwrap();
        let loader = Arc::new(MockLoader::new(doc("Petstore")));

        let mut config = ServerConfig::new(SpecSource::parse("petstore.json"));
        config.render.server_side_render = ssr;
        let renderer = PageRenderer::new(EngineAssets::from_dir(dir.path()));
        let server = LiveServer::start(config, Arc::clone(&loader) as Arc<dyn SpecLoader>, renderer)
            .await
            .unwrap();

        Fixture {
            dir,
            loader,
            server,
        }
    }

    async fn send(router: Router, method: Method, uri: &str, accept: Option<&str>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(accept) = accept {
            request = request.header(ACCEPT_ENCODING, accept);
        }
        router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn get(router: Router, uri: &str) -> Response {
        send(router, Method::GET, uri, None).await
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root_serves_current_page() {
        let fixture = fixture(true).await;

        let response = get(fixture.server.router(), "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert!(response.headers().get(CONTENT_ENCODING).is_none());
        let html = body_text(response).await;
        assert!(html.contains("Redoc.hydrate(__redoc_state, container);"));
        assert_eq!(html.as_bytes(), fixture.server.store().current().page().as_ref());
    }

    #[tokio::test]
    async fn test_root_is_compressed_when_accepted() {
        let fixture = fixture(false).await;
        let expected = fixture.server.store().current().page().clone();

        let response = send(fixture.server.router(), Method::GET, "/", Some("gzip, deflate")).await;
        assert_eq!(response.headers()[CONTENT_ENCODING], "deflate");

        let compressed = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let mut decoded = Vec::new();
        ZlibDecoder::new(compressed.as_ref())
            .read_to_end(&mut decoded)
            .await
            .unwrap();
        assert_eq!(decoded, expected.to_vec());
    }

    #[tokio::test]
    async fn test_spec_json_is_pretty_printed() {
        let fixture = fixture(false).await;

        let response = get(fixture.server.router(), "/spec.json").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body = body_text(response).await;
        assert_eq!(body, serde_json::to_string_pretty(&doc("Petstore")).unwrap());
    }

    #[tokio::test]
    async fn test_runtime_script_is_streamed() {
        let fixture = fixture(false).await;

        let response = get(fixture.server.router(), "/redoc.standalone.js").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/javascript");
        assert_eq!(body_text(response).await, RUNTIME);

        let response = send(
            fixture.server.router(),
            Method::GET,
            "/redoc.standalone.js",
            Some("gzip"),
        )
        .await;
        assert_eq!(response.headers()[CONTENT_ENCODING], "gzip");
        let compressed = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let mut decoded = String::new();
        GzipDecoder::new(compressed.as_ref())
            .read_to_string(&mut decoded)
            .await
            .unwrap();
        assert_eq!(decoded, RUNTIME);
    }

    #[tokio::test]
    async fn test_missing_runtime_script_is_not_found() {
        let fixture = fixture(false).await;
        std::fs::remove_file(fixture.dir.path().join(RUNTIME_SCRIPT)).unwrap();

        let response = get(fixture.server.router(), "/redoc.standalone.js").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unmatched_routes_are_not_found() {
        let fixture = fixture(false).await;

        for uri in ["/favicon.ico", "/index.html", "/spec.json/", "/api/spec.json"] {
            let response = get(fixture.server.router(), uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
            assert_eq!(body_text(response).await, "Not found");
        }
    }

    #[tokio::test]
    async fn test_other_methods_are_not_found() {
        let fixture = fixture(false).await;

        let response = send(fixture.server.router(), Method::POST, "/", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Not found");
    }

    #[tokio::test]
    async fn test_head_is_not_found() {
        let fixture = fixture(false).await;

        for uri in ["/", "/redoc.standalone.js", "/spec.json"] {
            let response = send(fixture.server.router(), Method::HEAD, uri, None).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        }
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_serving_previous_page() {
        let fixture = fixture(true).await;
        let before = body_text(get(fixture.server.router(), "/").await).await;

        fixture.loader.fail_with("mapping values are not allowed here");
        fixture.server.reloader.spawn_reload().await.unwrap();

        let after = body_text(get(fixture.server.router(), "/").await).await;
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_successful_reload_is_served() {
        let fixture = fixture(true).await;

        fixture.loader.set_document(doc("Bookstore"));
        fixture.server.reloader.spawn_reload().await.unwrap();

        let html = body_text(get(fixture.server.router(), "/").await).await;
        assert!(html.contains("<h1>Bookstore"));
        let spec = body_text(get(fixture.server.router(), "/spec.json").await).await;
        assert!(spec.contains("\"title\": \"Bookstore\""));
    }

    #[tokio::test]
    async fn test_start_fails_before_listening() {
        let loader = Arc::new(MockLoader::new(doc("Petstore")));
        loader.fail_with("unexpected end of input");

        let result = LiveServer::start(
            ServerConfig::new(SpecSource::parse("petstore.json")),
            loader,
            PageRenderer::new(EngineAssets::default()),
        )
        .await;

        assert!(matches!(result, Err(ServerError::Load(_))));
    }

    #[tokio::test]
    async fn test_listen_reports_bind_failure() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let mut fixture = fixture(false).await;
        fixture.server.config.port = port;
        let result = fixture.server.listen().await;

        assert!(matches!(result, Err(ServerError::Listen { .. })));
    }

    #[tokio::test]
    async fn test_listen_on_ephemeral_port() {
        let mut fixture = fixture(false).await;
        fixture.server.config.port = 0;

        let listening = fixture.server.listen().await.unwrap();

        assert_ne!(listening.local_addr().unwrap().port(), 0);
        assert!(listening.watcher.is_none());
    }

    async fn wait_for_sequence(store: &PageStore, sequence: u64) -> bool {
        for _ in 0..100 {
            if store.current().sequence() >= sequence {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_watched_file_edits_are_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RUNTIME_SCRIPT), RUNTIME).unwrap();
        let spec_path = dir.path().join("openapi.json");
        std::fs::write(&spec_path, doc("Before").to_string()).unwrap();

        let mut config = ServerConfig::new(SpecSource::Path(spec_path.clone()));
        config.port = 0;
        config.watch = true;
        config.debounce = Duration::from_millis(100);
        config.render.server_side_render = true;
        config.render.use_cdn = true;
        let renderer = PageRenderer::new(EngineAssets::from_dir(dir.path()));

        let server = LiveServer::start(config, Arc::new(DocumentLoader::default()), renderer)
            .await
            .unwrap();
        let store = server.store();
        let router = server.router();
        let listening = server.listen().await.unwrap();
        assert!(listening.watcher.is_some());
        assert_eq!(store.current().sequence(), 1);

        // Broken edit: the reload fails and the first page stays.
        std::fs::write(&spec_path, "{\"openapi\": ").unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.current().sequence(), 1);
        let html = body_text(get(router.clone(), "/").await).await;
        assert!(html.contains("<h1>Before"));

        std::fs::write(&spec_path, doc("After").to_string()).unwrap();
        assert!(wait_for_sequence(&store, 2).await);

        let html = body_text(get(router.clone(), "/").await).await;
        assert!(html.contains("<h1>After"));
        let spec = body_text(get(router, "/spec.json").await).await;
        assert!(spec.contains("\"title\": \"After\""));
        drop(listening);
    }
}
