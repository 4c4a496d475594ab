//! Filesystem backend configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default base directory for blob storage
pub const DEFAULT_BASE_PATH: &str = "./blob-storage";

/// Configuration for the filesystem blob backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSystemBlobConfig {
    /// Base directory all resolved blob paths live under.
    ///
    /// A relative path is resolved against the process working directory
    /// when the path calculator is constructed; supply an absolute path
    /// to make blob locations independent of where the process starts.
    pub base_path: PathBuf,
}

impl FileSystemBlobConfig {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Default for FileSystemBlobConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
        }
    }
}
