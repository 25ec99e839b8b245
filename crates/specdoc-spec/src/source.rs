//! Specification locations.

use std::fmt;
use std::path::{Path, PathBuf};

/// Check whether a location refers to a remote document.
pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Where a specification is loaded from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecSource {
    /// Local file.
    Path(PathBuf),
    /// Remote document fetched over HTTP(S).
    Url(String),
}

impl SpecSource {
    /// Classify a location given on the command line.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if is_url(location) {
            Self::Url(location.to_owned())
        } else {
            Self::Path(PathBuf::from(location))
        }
    }

    /// The URL, if this source is remote.
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Path(_) => None,
        }
    }

    /// The file path, if this source is local.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Url(_) => None,
        }
    }
}

impl fmt::Display for SpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("http://example.com/openapi.json"));
        assert!(is_url("https://example.com/openapi.yaml"));
        assert!(!is_url("openapi.yaml"));
        assert!(!is_url("/abs/path/openapi.yaml"));
        assert!(!is_url("ftp://example.com/openapi.yaml"));
    }

    #[test]
    fn test_parse_url() {
        let source = SpecSource::parse("https://example.com/openapi.json");
        assert_eq!(source.as_url(), Some("https://example.com/openapi.json"));
        assert!(source.as_path().is_none());
    }

    #[test]
    fn test_parse_path() {
        let source = SpecSource::parse("specs/openapi.yaml");
        assert_eq!(source.as_path(), Some(Path::new("specs/openapi.yaml")));
        assert!(source.as_url().is_none());
        assert_eq!(source.to_string(), "specs/openapi.yaml");
    }
}
