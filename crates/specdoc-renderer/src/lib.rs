//! HTML page generation for specdoc.
//!
//! Turns a loaded [`Specification`](specdoc_spec::Specification) and a set of
//! [`RenderOptions`] into one self-contained HTML document.
//!
//! # Rendering Modes
//!
//! - **Pre-rendered**: the [`RenderEngine`] produces markup, styles and a
//!   serialized state blob; the page hydrates that state on load.
//! - **Shell**: no engine call; the page loads the runtime script and
//!   initializes itself from the `spec.json` endpoint.
//!
//! Both modes are expressed as a [`PageVariant`] and assembled into the page
//! template by the same code path.
//!
//! # Example
//!
//! ```ignore
//! use specdoc_assets::EngineAssets;
//! use specdoc_renderer::{PageRenderer, RenderOptions};
//!
//! let renderer = PageRenderer::new(EngineAssets::default());
//! let options = RenderOptions {
//!     server_side_render: true,
//!     ..RenderOptions::default()
//! };
//! let page = renderer.render(&spec, &source, &options)?;
//! ```

mod engine;
mod error;
mod options;
mod page;
mod reference;
mod renderer;
mod template;

pub use engine::{EngineError, Markup, RenderEngine, RenderStore};
pub use error::RenderError;
pub use options::{DEFAULT_PAGE_TITLE, RenderOptions};
pub use page::{PageVariant, RuntimeScript, SPEC_ENDPOINT, sanitize_json};
pub use reference::ReferenceEngine;
pub use renderer::{PageRenderer, RenderedPage};
pub use template::{PageTemplate, TemplateSlots};
