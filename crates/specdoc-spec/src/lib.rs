//! API description loading for specdoc.
//!
//! Turns a location given on the command line into an in-memory
//! [`Specification`]:
//!
//! - [`SpecSource`] tells local files apart from remote URLs
//! - [`SpecLoader`] is the seam used by the server and the bundler
//! - [`DocumentLoader`] reads files or fetches URLs and parses JSON or YAML
//! - [`MockLoader`] for testing (behind `mock` feature flag)
//!
//! Content-model validation is not performed: any document whose top level is
//! a mapping is accepted.

mod error;
mod loader;
#[cfg(feature = "mock")]
mod mock;
mod source;
mod specification;

pub use error::SpecLoadError;
pub use loader::{DocumentLoader, SpecLoader};
#[cfg(feature = "mock")]
pub use mock::MockLoader;
pub use source::{SpecSource, is_url};
pub use specification::Specification;
