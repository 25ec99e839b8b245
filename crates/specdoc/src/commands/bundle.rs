//! `specdoc bundle` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use specdoc_bundler::{BundleConfig, StaticBundler};
use specdoc_config::{CliSettings, Config};
use specdoc_renderer::PageRenderer;
use specdoc_spec::{DocumentLoader, SpecSource};

use super::{engine_assets, render_options};
use crate::dotted::DottedArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the bundle command.
#[derive(Args)]
pub(crate) struct BundleArgs {
    /// Path or URL of the API specification.
    spec: String,

    /// Output HTML file (default: redoc-static.html).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page title (overrides config).
    #[arg(long)]
    title: Option<String>,

    /// Reference the runtime script from a CDN instead of inlining it.
    #[arg(long)]
    cdn: bool,

    /// Custom page template.
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Do not include the web font stylesheet.
    #[arg(long)]
    disable_google_font: bool,

    /// Path to configuration file (default: auto-discover specdoc.toml).
    #[arg(short, long, env = "SPECDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BundleArgs {
    /// Execute the bundle command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the specification cannot be
    /// loaded or rendered, or the output cannot be written.
    pub(crate) fn execute(self, dotted: DottedArgs) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            title: self.title,
            template: self.template,
            output: self.output,
            cdn: self.cdn.then_some(true),
            disable_google_font: self.disable_google_font.then_some(true),
            options: dotted.options,
            template_options: dotted.template_options,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source = SpecSource::parse(&self.spec);
        output.info(&format!("Source: {source}"));
        output.info(&format!(
            "Output: {}",
            config.bundle_resolved.output.display()
        ));

        let bundler = StaticBundler::new(
            Arc::new(DocumentLoader::default()),
            PageRenderer::new(engine_assets(&config)),
        );
        let report = bundler.bundle(&BundleConfig {
            source,
            output: config.bundle_resolved.output.clone(),
            render: render_options(&config, true, config.bundle_resolved.cdn),
        })?;

        output.success(&format!(
            "Bundled successfully in: {} ({} bytes)",
            report.output.display(),
            report.bytes
        ));
        Ok(())
    }
}
