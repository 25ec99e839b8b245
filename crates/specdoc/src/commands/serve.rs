//! `specdoc serve` command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use specdoc_config::{CliSettings, Config};
use specdoc_renderer::PageRenderer;
use specdoc_server::{Encoding, LiveServer, ServerConfig};
use specdoc_spec::{DocumentLoader, SpecSource};

use super::{engine_assets, render_options};
use crate::dotted::DottedArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path or URL of the API specification.
    spec: String,

    /// Path to configuration file (default: auto-discover specdoc.toml).
    #[arg(short, long, env = "SPECDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Pre-render the page on the server.
    #[arg(long)]
    ssr: bool,

    /// Re-render when the specification file changes.
    #[arg(short, long)]
    watch: bool,

    /// Custom page template.
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Page title (overrides config).
    #[arg(long)]
    title: Option<String>,

    /// Do not include the web font stylesheet.
    #[arg(long)]
    disable_google_font: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the initial render fails or
    /// the server cannot listen.
    pub(crate) async fn execute(self, dotted: DottedArgs) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            ssr: self.ssr.then_some(true),
            watch: self.watch.then_some(true),
            title: self.title,
            template: self.template,
            disable_google_font: self.disable_google_font.then_some(true),
            options: dotted.options,
            template_options: dotted.template_options,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source = SpecSource::parse(&self.spec);
        output.info(&format!("Loading {source}"));

        let server_config = ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
            source,
            render: render_options(&config, config.server.ssr, false),
            watch: config.server.watch,
            debounce: Duration::from_millis(config.server.debounce_ms),
            compression: config
                .server
                .compression
                .iter()
                .map(|name| name.parse::<Encoding>())
                .collect::<Result<_, _>>()?,
        };
        tracing::info!(
            ssr = config.server.ssr,
            watch = config.server.watch,
            "Server configuration loaded"
        );

        let renderer = PageRenderer::new(engine_assets(&config));
        let server = LiveServer::start(server_config, Arc::new(DocumentLoader::default()), renderer)
            .await?
            .listen()
            .await?;

        let addr = server.local_addr()?;
        output.success(&format!(
            "Server started: http://{}:{}",
            config.server.host,
            addr.port()
        ));
        output.highlight("Press Ctrl+C to stop");

        server.serve().await?;
        Ok(())
    }
}
