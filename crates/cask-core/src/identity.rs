//! Blob identity: the addressing tuple shared by all backends

use std::fmt;

/// Uniquely addresses a blob: a container name, a blob name, and an
/// optional scope qualifier isolating otherwise identical identities.
///
/// Identity is the key used for path resolution; no two distinct
/// identities may resolve to the same storage location. Syntactic
/// validation (non-empty fields, no traversal sequences) is enforced by
/// the backend's path calculator before any storage access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobIdentity {
    /// Logical namespace grouping related blobs
    pub container: String,
    /// Blob name within the container; may contain `/` separators
    pub blob: String,
    /// Optional scope qualifier (e.g. a tenant)
    pub scope: Option<String>,
}

impl BlobIdentity {
    pub fn new(container: impl Into<String>, blob: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            blob: blob.into(),
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

impl fmt::Display for BlobIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}@{}/{}", scope, self.container, self.blob),
            None => write!(f, "{}/{}", self.container, self.blob),
        }
    }
}
