//! Identity-to-path mapping for the filesystem backend

use std::path::PathBuf;

use cask_core::{BlobError, BlobIdentity, BlobResult};

use crate::config::FileSystemBlobConfig;

/// Subdirectory for blobs with no scope qualifier
pub const HOST_DIR: &str = "host";
/// Subdirectory grouping scope-qualified blobs
pub const SCOPES_DIR: &str = "scopes";

/// Maps a blob identity to an absolute filesystem path.
///
/// Implementations must be pure and deterministic: no I/O, same identity
/// always yields the same path, distinct identities yield distinct paths.
/// Identity validation (empty fields, traversal sequences) happens here,
/// unconditionally, before any filesystem access — it is a security
/// boundary, not something left to the filesystem.
pub trait FilePathCalculator: Send + Sync {
    fn calculate(&self, identity: &BlobIdentity) -> BlobResult<PathBuf>;
}

/// Hierarchical directory-per-container layout under a base path:
///
/// - unscoped: `<base>/host/<container>/<blob>`
/// - scoped:   `<base>/scopes/<scope>/<container>/<blob>`
///
/// Blob names may contain `/` separators; containers and scopes are
/// single path segments, which keeps the mapping collision-free without
/// an escaping scheme.
pub struct DefaultFilePathCalculator {
    base_path: PathBuf,
}

impl DefaultFilePathCalculator {
    pub fn new(config: &FileSystemBlobConfig) -> Self {
        Self::with_base_path(&config.base_path)
    }

    /// A relative base is resolved against the current working directory
    /// once, here, so every calculated path is absolute and stable for
    /// the calculator's lifetime.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        Self {
            base_path: std::path::absolute(&base_path).unwrap_or(base_path),
        }
    }
}

impl FilePathCalculator for DefaultFilePathCalculator {
    fn calculate(&self, identity: &BlobIdentity) -> BlobResult<PathBuf> {
        validate_segment("container name", &identity.container)?;
        if let Some(scope) = &identity.scope {
            validate_segment("scope", scope)?;
        }
        validate_blob_name(&identity.blob)?;

        let mut path = self.base_path.clone();
        match &identity.scope {
            Some(scope) => {
                path.push(SCOPES_DIR);
                path.push(scope);
            }
            None => path.push(HOST_DIR),
        }
        path.push(&identity.container);
        for segment in identity.blob.split('/') {
            path.push(segment);
        }
        Ok(path)
    }
}

fn validate_segment(field: &str, value: &str) -> BlobResult<()> {
    if value.is_empty() {
        return Err(BlobError::InvalidIdentity(format!(
            "{field} must not be empty"
        )));
    }
    if value == "." || value == ".." {
        return Err(BlobError::InvalidIdentity(format!(
            "{field} must not be a directory reference: '{value}'"
        )));
    }
    if value.contains('/') || value.contains('\\') {
        return Err(BlobError::InvalidIdentity(format!(
            "{field} must not contain path separators: '{value}'"
        )));
    }
    if value.contains(':') || value.contains('\0') {
        return Err(BlobError::InvalidIdentity(format!(
            "{field} contains forbidden characters"
        )));
    }
    Ok(())
}

fn validate_blob_name(value: &str) -> BlobResult<()> {
    if value.is_empty() {
        return Err(BlobError::InvalidIdentity(
            "blob name must not be empty".to_string(),
        ));
    }
    if value.starts_with('/') {
        return Err(BlobError::InvalidIdentity(format!(
            "blob name must not be absolute: '{value}'"
        )));
    }
    // Empty segments also catch "a//b" and trailing separators
    for segment in value.split('/') {
        validate_segment("blob name segment", segment)?;
    }
    Ok(())
}
