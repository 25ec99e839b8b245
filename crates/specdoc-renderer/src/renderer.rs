//! Page renderer.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use specdoc_assets::{CDN_RUNTIME_URL, EngineAssets, RUNTIME_SCRIPT};
use specdoc_spec::{SpecSource, Specification};

use crate::engine::{Markup, RenderEngine};
use crate::error::RenderError;
use crate::options::RenderOptions;
use crate::page::{PageVariant, RuntimeScript};
use crate::reference::ReferenceEngine;
use crate::template::{PageTemplate, TemplateSlots};

/// A complete HTML document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    html: String,
}

impl RenderedPage {
    /// Page markup.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Consume the page, returning its markup.
    #[must_use]
    pub fn into_string(self) -> String {
        self.html
    }

    /// Size of the page in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.html.len()
    }

    /// Whether the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// Produces HTML pages from specifications.
///
/// Rendering is a pure function of the specification, source and options:
/// identical inputs produce byte-identical pages.
#[derive(Clone)]
pub struct PageRenderer {
    engine: Arc<dyn RenderEngine>,
    assets: EngineAssets,
}

impl PageRenderer {
    /// Create a renderer backed by the built-in engine.
    #[must_use]
    pub fn new(assets: EngineAssets) -> Self {
        Self {
            engine: Arc::new(ReferenceEngine),
            assets,
        }
    }

    /// Replace the rendering engine.
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn RenderEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Engine distribution used for the runtime script.
    #[must_use]
    pub fn assets(&self) -> &EngineAssets {
        &self.assets
    }

    /// Render a full page.
    pub fn render(
        &self,
        spec: &Specification,
        source: &SpecSource,
        options: &RenderOptions,
    ) -> Result<RenderedPage, RenderError> {
        let start = Instant::now();
        let template = PageTemplate::resolve(options.template_path.as_deref())?;

        let variant = if options.server_side_render {
            self.pre_render(spec, source, options)?
        } else {
            PageVariant::Shell {
                options: options.engine_options.clone(),
            }
        };

        let html = template.render(TemplateSlots {
            title: &options.page_title,
            head: variant.head(),
            body: variant.body()?,
            disable_google_font: options.disable_google_font,
            template_options: &options.template_options,
        })?;

        tracing::debug!(
            ssr = options.server_side_render,
            bytes = html.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Rendered page"
        );
        Ok(RenderedPage { html })
    }

    fn pre_render(
        &self,
        spec: &Specification,
        source: &SpecSource,
        options: &RenderOptions,
    ) -> Result<PageVariant, RenderError> {
        let spec_url = effective_spec_url(&options.engine_options, source);
        let store = self
            .engine
            .create_store(spec, spec_url.as_deref(), &options.engine_options)?;
        let Markup { html, styles } = self.engine.render_markup(&store)?;
        let state = self.engine.serialize_state(&store)?;

        let runtime = if options.use_cdn {
            RuntimeScript::Remote(CDN_RUNTIME_URL.to_owned())
        } else {
            let body = self
                .assets
                .runtime_script()
                .ok_or_else(|| RenderError::MissingRuntime {
                    script: RUNTIME_SCRIPT,
                    location: self.assets.dir().map_or_else(
                        || "embedded assets".to_owned(),
                        |dir| dir.display().to_string(),
                    ),
                })?;
            RuntimeScript::Inline(body)
        };

        Ok(PageVariant::PreRendered {
            markup: html,
            styles,
            state,
            runtime,
        })
    }
}

/// URL recorded in the page state: the `specUrl` option, else the source URL.
fn effective_spec_url(options: &Map<String, Value>, source: &SpecSource) -> Option<String> {
    options
        .get("specUrl")
        .and_then(Value::as_str)
        .or_else(|| source.as_url())
        .map(str::to_owned)
}
