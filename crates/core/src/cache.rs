// Directory-backed content cache for remote sources

use crate::error::{Result, VideoError};
use std::fs;
use std::path::{Path, PathBuf};

/// Cache configuration carried on the stream descriptor for the engine's
/// fetch path. Entries are never evicted by this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub directory: PathBuf,
    /// Bypass the cache instead of failing playback when it misbehaves
    pub ignore_on_error: bool,
}

/// Directory-backed content cache with a no-eviction policy.
///
/// Local (asset/file) sources never use it; remote sources get its config
/// attached to their stream descriptor when a cache directory is configured.
pub struct ContentCache {
    directory: PathBuf,
}

impl ContentCache {
    /// Open the cache, creating the directory if needed.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| {
            VideoError::Io(format!(
                "failed to create cache directory {}: {}",
                directory.display(),
                e
            ))
        })?;
        log::debug!("[cache] opened at {}", directory.display());
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Fetch-path configuration handed to the engine.
    pub fn config(&self) -> CacheConfig {
        CacheConfig {
            directory: self.directory.clone(),
            ignore_on_error: true,
        }
    }

    /// Release the cache handle. Cached content stays on disk.
    pub fn release(self) {
        log::debug!("[cache] released {}", self.directory.display());
    }
}
