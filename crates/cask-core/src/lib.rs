//! cask-core: backend-agnostic blob storage contract
//!
//! Defines the identity, request, and error types shared by every blob
//! storage backend, the [`BlobProvider`] trait backends implement, and the
//! [`BlobContainer`] wrapper callers work with.

pub mod container;
pub mod error;
pub mod identity;
pub mod provider;
pub mod requests;

pub use container::BlobContainer;
pub use error::{BlobError, BlobResult};
pub use identity::BlobIdentity;
pub use provider::{BlobProvider, BlobStream};
pub use requests::{DeleteBlobRequest, ExistsBlobRequest, GetBlobRequest, SaveBlobRequest};

// Re-export external dependencies
pub use async_trait;
pub use tokio_util::sync::CancellationToken;
