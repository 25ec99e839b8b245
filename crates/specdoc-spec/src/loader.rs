//! Specification loaders.

use std::time::{Duration, Instant};

use ureq::Agent;

use crate::{SpecLoadError, SpecSource, Specification};

/// Default timeout for fetching remote documents.
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Loads a [`Specification`] from a [`SpecSource`].
///
/// Implementations must be callable from several threads at once: the live
/// server reloads from a blocking worker while requests keep being served.
pub trait SpecLoader: Send + Sync {
    /// Load and parse the document at `source`.
    fn load(&self, source: &SpecSource) -> Result<Specification, SpecLoadError>;
}

/// Loader for local files and HTTP(S) URLs.
pub struct DocumentLoader {
    agent: Agent,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }
}

impl DocumentLoader {
    /// Create a loader whose remote fetches give up after `timeout`.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    fn fetch(&self, url: &str) -> Result<String, SpecLoadError> {
        let fetch_error = |message: String| SpecLoadError::Fetch {
            url: url.to_owned(),
            message,
        };

        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            return Err(fetch_error(format!("HTTP {status}")));
        }

        body.read_to_string().map_err(|e| fetch_error(e.to_string()))
    }
}

impl SpecLoader for DocumentLoader {
    fn load(&self, source: &SpecSource) -> Result<Specification, SpecLoadError> {
        let start = Instant::now();

        let text = match source {
            SpecSource::Path(path) => {
                std::fs::read_to_string(path).map_err(|e| SpecLoadError::Read {
                    path: path.clone(),
                    source: e,
                })?
            }
            SpecSource::Url(url) => self.fetch(url)?,
        };

        let spec = Specification::parse(&text, &source.to_string())?;

        tracing::debug!(
            source = %source,
            bytes = text.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Loaded specification"
        );

        Ok(spec)
    }
}
