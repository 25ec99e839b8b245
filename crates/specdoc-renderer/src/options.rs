//! Page rendering options.

use std::path::PathBuf;

use serde_json::{Map, Value};

/// Page title used when none is given.
pub const DEFAULT_PAGE_TITLE: &str = "ReDoc documentation";

/// Options controlling a single render cycle.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Pre-render markup and state instead of emitting a client-side shell.
    pub server_side_render: bool,
    /// Reference the runtime script from a CDN instead of inlining it.
    ///
    /// Only affects pre-rendered pages; shells always reference the script
    /// served next to the page.
    pub use_cdn: bool,
    /// Content of the page `<title>`.
    pub page_title: String,
    /// Custom template (`None` uses the built-in one).
    pub template_path: Option<PathBuf>,
    /// Leave the web font stylesheet out of the built-in template.
    pub disable_google_font: bool,
    /// Options handed to the rendering engine untouched.
    ///
    /// `specUrl`, if present, overrides the URL recorded in the page state.
    pub engine_options: Map<String, Value>,
    /// Options exposed to the template as `template_options`.
    pub template_options: Map<String, Value>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            server_side_render: false,
            use_cdn: false,
            page_title: DEFAULT_PAGE_TITLE.to_owned(),
            template_path: None,
            disable_google_font: false,
            engine_options: Map::new(),
            template_options: Map::new(),
        }
    }
}
