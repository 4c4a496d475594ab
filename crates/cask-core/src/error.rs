//! Error types shared by all blob storage backends

use thiserror::Error;

use crate::identity::BlobIdentity;

/// Errors that can occur in blob storage operations
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Invalid blob identity: {0}")]
    InvalidIdentity(String),

    #[error("Blob '{blob}' already exists in container '{container}'")]
    AlreadyExists { container: String, blob: String },

    #[error("I/O failure for blob '{blob}' in container '{container}': {source}")]
    Io {
        container: String,
        blob: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation cancelled for blob '{blob}' in container '{container}'")]
    Cancelled { container: String, blob: String },
}

impl BlobError {
    pub fn already_exists(identity: &BlobIdentity) -> Self {
        Self::AlreadyExists {
            container: identity.container.clone(),
            blob: identity.blob.clone(),
        }
    }

    pub fn io(identity: &BlobIdentity, source: std::io::Error) -> Self {
        Self::Io {
            container: identity.container.clone(),
            blob: identity.blob.clone(),
            source,
        }
    }

    pub fn cancelled(identity: &BlobIdentity) -> Self {
        Self::Cancelled {
            container: identity.container.clone(),
            blob: identity.blob.clone(),
        }
    }
}

/// Result type alias for blob storage operations
pub type BlobResult<T> = Result<T, BlobError>;
