//! Documentation engine distribution for specdoc.
//!
//! The rendered pages rely on a browser runtime script (`redoc.standalone.js`)
//! that either gets inlined into the page, served by the live server, or
//! referenced from a CDN. This crate locates that distribution:
//!
//! - **`embed` feature on**: files are compiled into the binary via `rust-embed`
//! - **`embed` feature off**: files are read from an engine directory at runtime

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// File name of the browser runtime script inside the engine distribution.
pub const RUNTIME_SCRIPT: &str = "redoc.standalone.js";

/// Remote location of the runtime script, used when pages reference a CDN.
pub const CDN_RUNTIME_URL: &str = "https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js";

/// Engine distribution directory used when none is configured.
pub const DEFAULT_ENGINE_DIR: &str = "engine/dist";

/// Embedded engine distribution (only available with `embed` feature).
#[cfg(feature = "embed")]
#[derive(rust_embed::RustEmbed)]
#[folder = "../../engine/dist"]
#[prefix = ""]
struct Embedded;

/// Where a distribution file lives.
#[derive(Debug)]
pub enum AssetSource {
    /// File contents already in memory.
    Memory(Cow<'static, [u8]>),
    /// File on disk, to be streamed by the caller.
    File(PathBuf),
}

/// Handle to the engine distribution.
#[derive(Clone, Debug)]
pub enum EngineAssets {
    /// Files compiled into the binary.
    #[cfg(feature = "embed")]
    Embedded,
    /// Files read from a directory at runtime.
    Dir(PathBuf),
}

impl Default for EngineAssets {
    #[cfg(feature = "embed")]
    fn default() -> Self {
        Self::Embedded
    }

    #[cfg(not(feature = "embed"))]
    fn default() -> Self {
        Self::Dir(PathBuf::from(DEFAULT_ENGINE_DIR))
    }
}

impl EngineAssets {
    /// Read the distribution from `dir`.
    #[must_use]
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::Dir(dir.into())
    }

    /// Locate a distribution file without reading it from disk.
    ///
    /// Returns `None` if the file does not exist.
    pub fn locate(&self, path: &str) -> Option<AssetSource> {
        match self {
            #[cfg(feature = "embed")]
            Self::Embedded => Embedded::get(path).map(|f| AssetSource::Memory(f.data)),
            Self::Dir(dir) => {
                let full_path = dir.join(path);
                full_path.is_file().then_some(AssetSource::File(full_path))
            }
        }
    }

    /// Get the contents of a distribution file.
    ///
    /// Returns `None` if the file does not exist or cannot be read.
    pub fn get(&self, path: &str) -> Option<Cow<'static, [u8]>> {
        match self.locate(path)? {
            AssetSource::Memory(data) => Some(data),
            AssetSource::File(full_path) => std::fs::read(&full_path).ok().map(Cow::Owned),
        }
    }

    /// Get the runtime script as text.
    pub fn runtime_script(&self) -> Option<String> {
        self.get(RUNTIME_SCRIPT)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Directory backing this distribution, if it is read from disk.
    pub fn dir(&self) -> Option<&Path> {
        match self {
            #[cfg(feature = "embed")]
            Self::Embedded => None,
            Self::Dir(dir) => Some(dir),
        }
    }
}
