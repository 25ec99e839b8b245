//! Page variants and head/body slot assembly.

use serde_json::{Map, Value};
use specdoc_assets::RUNTIME_SCRIPT;

/// Relative URL a shell page fetches the specification from.
pub const SPEC_ENDPOINT: &str = "spec.json";

/// How a pre-rendered page obtains the runtime script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeScript {
    /// Script body inlined into the page.
    Inline(String),
    /// Script referenced by URL.
    Remote(String),
}

/// The two shapes a generated page can take.
#[derive(Clone, Debug, PartialEq)]
pub enum PageVariant {
    /// Markup and state produced ahead of time; hydrated on load.
    PreRendered {
        markup: String,
        styles: String,
        state: Value,
        runtime: RuntimeScript,
    },
    /// Empty container initialized by the runtime from [`SPEC_ENDPOINT`].
    Shell { options: Map<String, Value> },
}

impl PageVariant {
    /// Content for the template head slot.
    #[must_use]
    pub fn head(&self) -> String {
        match self {
            Self::PreRendered {
                styles, runtime, ..
            } => {
                let script = match runtime {
                    RuntimeScript::Inline(body) => format!("<script>{body}</script>"),
                    RuntimeScript::Remote(url) => format!("<script src=\"{url}\"></script>"),
                };
                format!("{script}<style>{styles}</style>")
            }
            Self::Shell { .. } => format!("<script src=\"{RUNTIME_SCRIPT}\"></script>"),
        }
    }

    /// Content for the template body slot.
    pub fn body(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::PreRendered { markup, state, .. } => {
                let state = sanitize_json(&serde_json::to_string(state)?);
                Ok(format!(
                    "<div id=\"redoc\">{markup}</div>\
                     <script>\
                     const __redoc_state = {state};\
                     var container = document.getElementById('redoc');\
                     Redoc.hydrate(__redoc_state, container);\
                     </script>"
                ))
            }
            Self::Shell { options } => {
                let options = sanitize_json(&serde_json::to_string(options)?);
                Ok(format!(
                    "<div id=\"redoc\"></div>\
                     <script>\
                     var container = document.getElementById('redoc');\
                     Redoc.init(\"{SPEC_ENDPOINT}\", {options}, container);\
                     </script>"
                ))
            }
        }
    }
}

/// Make serialized JSON safe to embed inside a `<script>` element.
///
/// `<` can only appear inside JSON strings, where `\u003c` is equivalent, so
/// no `</script>` sequence survives. Line and paragraph separators are
/// escaped for older script parsers.
#[must_use]
pub fn sanitize_json(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => result.push_str("\\u003c"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            _ => result.push(c),
        }
    }
    result
}
