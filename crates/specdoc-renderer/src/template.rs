//! Page template.

use std::borrow::Cow;
use std::path::Path;

use minijinja::{AutoEscape, Environment, Value, context};
use serde_json::Map;

use crate::error::RenderError;

const BUILTIN_TEMPLATE: &str = include_str!("templates/index.html");
const BUILTIN_NAME: &str = "index.html";

/// Values substituted into the template.
///
/// `head` and `body` are inserted verbatim; everything else is escaped.
#[derive(Debug)]
pub struct TemplateSlots<'a> {
    pub title: &'a str,
    pub head: String,
    pub body: String,
    pub disable_google_font: bool,
    pub template_options: &'a Map<String, serde_json::Value>,
}

/// HTML page template, rendered with minijinja.
///
/// Templates see these variables:
///
/// | Variable | Content |
/// |----------|---------|
/// | `title` | Page title, HTML-escaped |
/// | `redoc_head` / `redocHead` | Runtime script and styles, inserted verbatim |
/// | `redoc_html` / `redocHTML` | Documentation container and init script, inserted verbatim |
/// | `disable_google_font` / `disableGoogleFont` | Whether to skip the web-font link |
/// | `template_options` / `templateOptions` | Values from `--templateOptions.*` |
///
/// Slots use Jinja syntax (`{{ redocHead }}`). Handlebars triple braces
/// (`{{{redocHead}}}`) are not understood.
#[derive(Clone, Debug)]
pub struct PageTemplate {
    name: String,
    source: Cow<'static, str>,
}

impl PageTemplate {
    /// The template shipped with specdoc.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            name: BUILTIN_NAME.to_owned(),
            source: Cow::Borrowed(BUILTIN_TEMPLATE),
        }
    }

    /// Read a custom template from disk.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|e| RenderError::TemplateRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            name: path.display().to_string(),
            source: Cow::Owned(source),
        })
    }

    /// Custom template at `path`, or the built-in one.
    pub fn resolve(path: Option<&Path>) -> Result<Self, RenderError> {
        path.map_or_else(|| Ok(Self::builtin()), Self::load)
    }

    /// Render the template.
    pub fn render(&self, slots: TemplateSlots<'_>) -> Result<String, RenderError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        let template = env.template_from_named_str(&self.name, &self.source)?;

        let head = Value::from_safe_string(slots.head);
        let body = Value::from_safe_string(slots.body);
        let template_options = Value::from_serialize(slots.template_options);

        let html = template.render(context! {
            title => slots.title,
            redoc_head => head.clone(),
            redocHead => head,
            redoc_html => body.clone(),
            redocHTML => body,
            disable_google_font => slots.disable_google_font,
            disableGoogleFont => slots.disable_google_font,
            template_options => template_options.clone(),
            templateOptions => template_options,
        })?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn slots<'a>(title: &'a str, options: &'a Map<String, serde_json::Value>) -> TemplateSlots<'a> {
        TemplateSlots {
            title,
            head: "<script src=\"redoc.standalone.js\"></script>".to_owned(),
            body: "<div id=\"redoc\"></div>".to_owned(),
            disable_google_font: false,
            template_options: options,
        }
    }

    #[test]
    fn test_builtin_inserts_slots_verbatim() {
        let options = Map::new();
        let html = PageTemplate::builtin().render(slots("Petstore", &options)).unwrap();

        assert!(html.contains("<title>Petstore</title>"));
        assert!(html.contains("<script src=\"redoc.standalone.js\"></script>"));
        assert!(html.contains("<div id=\"redoc\"></div>"));
        assert!(html.contains("fonts.googleapis.com"));
    }

    #[test]
    fn test_title_is_escaped() {
        let options = Map::new();
        let html = PageTemplate::builtin()
            .render(slots("Pets & <Friends>", &options))
            .unwrap();

        assert!(html.contains("<title>Pets &amp; &lt;Friends&gt;</title>"));
    }

    #[test]
    fn test_google_font_can_be_disabled() {
        let options = Map::new();
        let mut slots = slots("Petstore", &options);
        slots.disable_google_font = true;

        let html = PageTemplate::builtin().render(slots).unwrap();

        assert!(!html.contains("fonts.googleapis.com"));
    }

    #[test]
    fn test_custom_template_with_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.hbs");
        std::fs::write(
            &path,
            "<html><head>{{ redoc_head }}</head>\
             <body data-theme=\"{{ template_options.theme }}\">{{ redoc_html }}</body></html>",
        )
        .unwrap();
        let mut options = Map::new();
        options.insert("theme".to_owned(), json!("dark"));

        let template = PageTemplate::resolve(Some(&path)).unwrap();
        let html = template.render(slots("Petstore", &options)).unwrap();

        assert_eq!(
            html,
            "<html><head><script src=\"redoc.standalone.js\"></script></head>\
             <body data-theme=\"dark\"><div id=\"redoc\"></div></body></html>"
        );
    }

    #[test]
    fn test_custom_template_with_camel_case_slots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.html");
        std::fs::write(
            &path,
            "<title>{{ title }}</title>{{ redocHead }}\
             {% if not disableGoogleFont %}<link rel=\"stylesheet\">{% endif %}\
             <main class=\"{{ templateOptions.layout }}\">{{ redocHTML }}</main>",
        )
        .unwrap();
        let mut options = Map::new();
        options.insert("layout".to_owned(), json!("wide"));
        let mut slots = slots("Petstore", &options);
        slots.disable_google_font = true;

        let html = PageTemplate::load(&path).unwrap().render(slots).unwrap();

        assert_eq!(
            html,
            "<title>Petstore</title><script src=\"redoc.standalone.js\"></script>\
             <main class=\"wide\"><div id=\"redoc\"></div></main>"
        );
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PageTemplate::resolve(Some(&dir.path().join("missing.html"))).unwrap_err();

        assert!(matches!(err, RenderError::TemplateRead { .. }));
    }

    #[test]
    fn test_malformed_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.html");
        std::fs::write(&path, "{% if %}").unwrap();

        let template = PageTemplate::load(&path).unwrap();
        let err = template.render(slots("Petstore", &Map::new())).unwrap_err();

        assert!(matches!(err, RenderError::Template(_)));
    }
}
