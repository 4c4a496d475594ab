//! The blob provider contract implemented by every backend

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::BlobResult;
use crate::requests::{DeleteBlobRequest, ExistsBlobRequest, GetBlobRequest, SaveBlobRequest};

/// A readable blob content stream; dropping it closes the underlying handle
pub type BlobStream = Box<dyn AsyncRead + Send + Unpin>;

/// The operation set every blob storage backend must satisfy
///
/// Providers hold no in-process mutable shared state; all coordination is
/// delegated to the underlying storage. Backend selection is configuration
/// owned by the caller, which works against `Arc<dyn BlobProvider>`.
#[async_trait]
pub trait BlobProvider: Send + Sync {
    /// Save a blob from a byte stream.
    ///
    /// With `override_existing == false`, fails with `AlreadyExists` if a
    /// blob is already stored under the request's identity; the existing
    /// content is not disturbed. On an I/O failure or cancellation
    /// mid-write, a partially written blob may be left behind — callers
    /// that need atomicity must stage to a temporary identity themselves.
    async fn save(&self, request: SaveBlobRequest) -> BlobResult<()>;

    /// Fetch a blob's content, or `None` if it does not exist.
    ///
    /// Ownership of the returned stream transfers to the caller.
    async fn get(&self, request: GetBlobRequest) -> BlobResult<Option<BlobStream>>;

    /// Whether a blob exists at the request's identity, at this instant.
    async fn exists(&self, request: ExistsBlobRequest) -> BlobResult<bool>;

    /// Delete a blob. Deleting an absent blob is not an error; returns
    /// `true` whether the blob was present or already absent.
    async fn delete(&self, request: DeleteBlobRequest) -> BlobResult<bool>;
}
