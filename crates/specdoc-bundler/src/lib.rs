//! Self-contained HTML bundle generation for specdoc.

mod bundler;

pub use bundler::{BundleConfig, BundleError, BundleReport, StaticBundler};
