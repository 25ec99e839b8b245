//! Loaded specification documents.

use serde::Serialize;
use serde_json::Value;

use crate::SpecLoadError;

/// A loaded API description.
///
/// Immutable once loaded; the server replaces it wholesale on reload.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Specification {
    document: Value,
}

impl Specification {
    /// Wrap an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`SpecLoadError::NotAnObject`] if the top level is not a mapping.
    pub fn from_value(document: Value, origin: &str) -> Result<Self, SpecLoadError> {
        if !document.is_object() {
            return Err(SpecLoadError::NotAnObject {
                origin: origin.to_owned(),
            });
        }
        Ok(Self { document })
    }

    /// Parse a document from JSON or YAML text.
    ///
    /// Text starting with `{` is parsed as JSON, everything else as YAML.
    /// YAML mapping keys that are not strings (such as unquoted response
    /// codes) are converted to strings.
    pub fn parse(text: &str, origin: &str) -> Result<Self, SpecLoadError> {
        let parse_error = |message: String| SpecLoadError::Parse {
            origin: origin.to_owned(),
            message,
        };

        let document = if text.trim_start().starts_with('{') {
            serde_json::from_str::<Value>(text).map_err(|e| parse_error(e.to_string()))?
        } else {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string()))?;
            serde_json::to_value(yaml).map_err(|e| parse_error(e.to_string()))?
        };

        Self::from_value(document, origin)
    }

    /// The raw document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// `info.title` of the document, if present.
    pub fn title(&self) -> Option<&str> {
        self.document.pointer("/info/title").and_then(Value::as_str)
    }

    /// `info.version` of the document, if present.
    pub fn version(&self) -> Option<&str> {
        self.document.pointer("/info/version").and_then(Value::as_str)
    }

    /// Serialize the document as pretty-printed JSON.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.document)
    }
}
