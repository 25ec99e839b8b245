//! Loading error types.

use std::path::PathBuf;

/// Error returned when a specification cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum SpecLoadError {
    /// Local file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote document could not be fetched.
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Document is neither valid JSON nor valid YAML.
    #[error("Failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    /// Document parsed, but its top level is not a mapping.
    #[error("{origin} is not an API description: expected a mapping at the top level")]
    NotAnObject { origin: String },
}
