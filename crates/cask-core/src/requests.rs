//! Request values carried into blob provider operations
//!
//! Every operation takes a request value bundling the blob identity, any
//! operation-specific options, and a cancellation token. Tokens default to
//! a fresh (never cancelled) token; callers wire their own with
//! `with_cancellation`.

use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

use crate::identity::BlobIdentity;
use crate::provider::BlobStream;

/// Request to save a blob from a byte stream
///
/// The stream is consumed exactly once and dropped by the provider
/// regardless of outcome.
pub struct SaveBlobRequest {
    pub identity: BlobIdentity,
    pub stream: BlobStream,
    /// When false, saving over an existing blob fails with
    /// [`BlobError::AlreadyExists`](crate::BlobError::AlreadyExists)
    pub override_existing: bool,
    pub cancellation: CancellationToken,
}

impl SaveBlobRequest {
    pub fn new(
        identity: BlobIdentity,
        stream: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            identity,
            stream: Box::new(stream),
            override_existing: false,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_override(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Request to fetch a blob's content
#[derive(Debug, Clone)]
pub struct GetBlobRequest {
    pub identity: BlobIdentity,
    pub cancellation: CancellationToken,
}

impl GetBlobRequest {
    pub fn new(identity: BlobIdentity) -> Self {
        Self {
            identity,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Request to check whether a blob exists
#[derive(Debug, Clone)]
pub struct ExistsBlobRequest {
    pub identity: BlobIdentity,
    pub cancellation: CancellationToken,
}

impl ExistsBlobRequest {
    pub fn new(identity: BlobIdentity) -> Self {
        Self {
            identity,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Request to delete a blob
#[derive(Debug, Clone)]
pub struct DeleteBlobRequest {
    pub identity: BlobIdentity,
    pub cancellation: CancellationToken,
}

impl DeleteBlobRequest {
    pub fn new(identity: BlobIdentity) -> Self {
        Self {
            identity,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}
