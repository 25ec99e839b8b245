//! CLI error types.

use specdoc_bundler::BundleError;
use specdoc_config::ConfigError;
use specdoc_server::{ServerError, UnknownEncoding};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Bundle(#[from] BundleError),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("{0}")]
    Encoding(#[from] UnknownEncoding),
}
