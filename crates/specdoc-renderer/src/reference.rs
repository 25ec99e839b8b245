//! Built-in reference engine.
//!
//! Renders an `OpenAPI` document as a single page: an info header, the server
//! list, and operations grouped by tag.

use std::fmt::Write;

use serde_json::{Map, Value, json};

use crate::engine::{EngineError, Markup, RenderEngine, RenderStore};

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

const UNTAGGED: &str = "default";

const STYLES: &str = "\
.api-content{font-family:Roboto,sans-serif;max-width:960px;margin:0 auto;padding:32px 40px;color:#333}\
.api-info h1{font-family:Montserrat,sans-serif;font-weight:400;margin:0 0 8px}\
.api-info .api-version{font-size:14px;color:#666}\
.api-download{display:inline-block;margin:12px 0;padding:4px 8px;border:1px solid #32329f;border-radius:2px;color:#32329f;text-decoration:none}\
.api-servers code{background:#f5f5f5;padding:2px 4px}\
.api-tag h2{font-family:Montserrat,sans-serif;font-weight:400;border-bottom:1px solid #e0e0e0;padding-bottom:8px}\
.api-operation{margin:24px 0}\
.api-operation .http-verb{display:inline-block;min-width:64px;padding:2px 8px;border-radius:3px;color:#fff;font-size:12px;text-transform:uppercase;text-align:center;background:#707070}\
.http-verb.get{background:#2f8132}.http-verb.post{background:#186faf}.http-verb.put{background:#95507c}\
.http-verb.delete{background:#cc3333}.http-verb.patch{background:#bf581d}\
.api-operation .operation-path{font-family:Courier,monospace;margin-left:8px}\
.api-operation.deprecated .operation-path{text-decoration:line-through}\
";

/// Engine that renders `OpenAPI` documents natively.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceEngine;

struct Operation<'a> {
    method: &'a str,
    path: &'a str,
    body: &'a Map<String, Value>,
}

impl Operation<'_> {
    fn anchor(&self) -> String {
        match self.body.get("operationId").and_then(Value::as_str) {
            Some(id) => format!("operation/{id}"),
            None => format!("operation/{}{}", self.method, self.path),
        }
    }
}

impl RenderEngine for ReferenceEngine {
    fn render_markup(&self, store: &RenderStore<'_>) -> Result<Markup, EngineError> {
        let doc = store.spec().document();
        let mut html = String::with_capacity(4096);

        html.push_str("<div class=\"api-content\">");
        render_info(&mut html, doc, store);
        if !store.flag("hideHostname") {
            render_servers(&mut html, doc);
        }
        for (tag, operations) in group_by_tag(doc) {
            render_tag(&mut html, doc, &tag, &operations);
        }
        html.push_str("</div>");

        Ok(Markup {
            html,
            styles: STYLES.to_owned(),
        })
    }

    fn serialize_state(&self, store: &RenderStore<'_>) -> Result<Value, EngineError> {
        Ok(json!({
            "menu": { "activeItemIdx": -1 },
            "spec": {
                "url": store.spec_url(),
                "data": store.spec().document(),
            },
            "options": store.options(),
        }))
    }
}

fn render_info(html: &mut String, doc: &Value, store: &RenderStore<'_>) {
    let info = doc.get("info");
    let title = info
        .and_then(|i| i.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("API documentation");

    html.push_str("<div class=\"api-info\">");
    let _ = write!(html, "<h1>{}", escape(title));
    if let Some(version) = info.and_then(|i| i.get("version")).and_then(Value::as_str) {
        let _ = write!(
            html,
            " <span class=\"api-version\">({})</span>",
            escape(version)
        );
    }
    html.push_str("</h1>");

    if let Some(url) = store.spec_url()
        && !store.flag("hideDownloadButton")
    {
        let _ = write!(
            html,
            "<a class=\"api-download\" download href=\"{}\">Download</a>",
            escape(url)
        );
    }
    if let Some(description) = info
        .and_then(|i| i.get("description"))
        .and_then(Value::as_str)
    {
        let _ = write!(
            html,
            "<div class=\"api-description\">{}</div>",
            escape(description)
        );
    }
    html.push_str("</div>");
}

fn render_servers(html: &mut String, doc: &Value) {
    let Some(servers) = doc.get("servers").and_then(Value::as_array) else {
        return;
    };
    let urls: Vec<&str> = servers
        .iter()
        .filter_map(|s| s.get("url").and_then(Value::as_str))
        .collect();
    if urls.is_empty() {
        return;
    }

    html.push_str("<ul class=\"api-servers\">");
    for url in urls {
        let _ = write!(html, "<li><code>{}</code></li>", escape(url));
    }
    html.push_str("</ul>");
}

fn render_tag(html: &mut String, doc: &Value, tag: &str, operations: &[Operation<'_>]) {
    let _ = write!(
        html,
        "<section class=\"api-tag\" id=\"tag/{}\"><h2>{}</h2>",
        escape(tag),
        escape(tag)
    );
    if let Some(description) = tag_description(doc, tag) {
        let _ = write!(html, "<p>{}</p>", escape(description));
    }

    for op in operations {
        let deprecated = op
            .body
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let class = if deprecated {
            "api-operation deprecated"
        } else {
            "api-operation"
        };
        let _ = write!(
            html,
            "<div class=\"{class}\" id=\"{}\">",
            escape(&op.anchor())
        );
        if let Some(summary) = op.body.get("summary").and_then(Value::as_str) {
            let _ = write!(html, "<h3>{}</h3>", escape(summary));
        }
        let _ = write!(
            html,
            "<div><span class=\"http-verb {m}\">{m}</span>\
             <span class=\"operation-path\">{}</span></div>",
            escape(op.path),
            m = op.method,
        );
        if let Some(description) = op.body.get("description").and_then(Value::as_str) {
            let _ = write!(html, "<p>{}</p>", escape(description));
        }
        html.push_str("</div>");
    }

    html.push_str("</section>");
}

/// Group operations by their first tag.
///
/// Tags declared at the document root come first, in declaration order; the
/// rest follow in order of first use.
fn group_by_tag(doc: &Value) -> Vec<(String, Vec<Operation<'_>>)> {
    let mut groups: Vec<(String, Vec<Operation<'_>>)> = doc
        .get("tags")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|t| t.get("name").and_then(Value::as_str))
        .map(|name| (name.to_owned(), Vec::new()))
        .collect();

    let Some(paths) = doc.get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };

    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for method in HTTP_METHODS {
            let Some(body) = item.get(method).and_then(Value::as_object) else {
                continue;
            };
            let tag = body
                .get("tags")
                .and_then(Value::as_array)
                .and_then(|tags| tags.first())
                .and_then(Value::as_str)
                .unwrap_or(UNTAGGED);
            let op = Operation { method, path, body };
            match groups.iter_mut().find(|(name, _)| name == tag) {
                Some((_, ops)) => ops.push(op),
                None => groups.push((tag.to_owned(), vec![op])),
            }
        }
    }

    groups.retain(|(_, ops)| !ops.is_empty());
    groups
}

fn tag_description<'a>(doc: &'a Value, tag: &str) -> Option<&'a str> {
    doc.get("tags")?
        .as_array()?
        .iter()
        .find(|t| t.get("name").and_then(Value::as_str) == Some(tag))?
        .get("description")?
        .as_str()
}

fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
