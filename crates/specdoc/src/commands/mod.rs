//! CLI command implementations.

pub(crate) mod bundle;
pub(crate) mod serve;

pub(crate) use bundle::BundleArgs;
pub(crate) use serve::ServeArgs;

use specdoc_assets::EngineAssets;
use specdoc_config::Config;
use specdoc_renderer::RenderOptions;

/// Engine distribution from config, or the built-in default.
fn engine_assets(config: &Config) -> EngineAssets {
    config
        .render_resolved
        .engine_dir
        .as_ref()
        .map_or_else(EngineAssets::default, EngineAssets::from_dir)
}

/// Render options from resolved config.
fn render_options(config: &Config, server_side_render: bool, use_cdn: bool) -> RenderOptions {
    let render = &config.render_resolved;
    RenderOptions {
        server_side_render,
        use_cdn,
        page_title: render.title.clone(),
        template_path: render.template.clone(),
        disable_google_font: render.disable_google_font,
        engine_options: render.engine_options.clone(),
        template_options: render.template_options.clone(),
    }
}
