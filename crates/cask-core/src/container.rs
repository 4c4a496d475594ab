//! Container-scoped convenience wrapper over a blob provider

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{BlobError, BlobResult};
use crate::identity::BlobIdentity;
use crate::provider::{BlobProvider, BlobStream};
use crate::requests::{DeleteBlobRequest, ExistsBlobRequest, GetBlobRequest, SaveBlobRequest};

/// Binds a container name (and optional scope) to a backend, so callers
/// address blobs by name alone.
#[derive(Clone)]
pub struct BlobContainer {
    name: String,
    scope: Option<String>,
    provider: Arc<dyn BlobProvider>,
}

impl BlobContainer {
    pub fn new(name: impl Into<String>, provider: Arc<dyn BlobProvider>) -> Self {
        Self {
            name: name.into(),
            scope: None,
            provider,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn identity(&self, blob_name: &str) -> BlobIdentity {
        let identity = BlobIdentity::new(&self.name, blob_name);
        match &self.scope {
            Some(scope) => identity.with_scope(scope),
            None => identity,
        }
    }

    /// Save a blob from a byte stream
    pub async fn save(
        &self,
        blob_name: &str,
        stream: impl AsyncRead + Send + Unpin + 'static,
        override_existing: bool,
        cancellation: CancellationToken,
    ) -> BlobResult<()> {
        let request = SaveBlobRequest::new(self.identity(blob_name), stream)
            .with_override(override_existing)
            .with_cancellation(cancellation);
        self.provider.save(request).await
    }

    /// Save a blob from an in-memory payload
    pub async fn save_bytes(
        &self,
        blob_name: &str,
        bytes: Bytes,
        override_existing: bool,
    ) -> BlobResult<()> {
        debug!("SAVE {} ({} bytes)", self.identity(blob_name), bytes.len());
        let request = SaveBlobRequest::new(self.identity(blob_name), std::io::Cursor::new(bytes))
            .with_override(override_existing);
        self.provider.save(request).await
    }

    /// Fetch a blob's content stream, or `None` if absent
    pub async fn get(&self, blob_name: &str) -> BlobResult<Option<BlobStream>> {
        self.provider
            .get(GetBlobRequest::new(self.identity(blob_name)))
            .await
    }

    /// Fetch a blob's full content, or `None` if absent
    pub async fn get_bytes(&self, blob_name: &str) -> BlobResult<Option<Vec<u8>>> {
        let identity = self.identity(blob_name);
        let stream = self.provider.get(GetBlobRequest::new(identity.clone())).await?;
        match stream {
            Some(mut stream) => {
                let mut content = Vec::new();
                stream
                    .read_to_end(&mut content)
                    .await
                    .map_err(|e| BlobError::io(&identity, e))?;
                Ok(Some(content))
            }
            None => Ok(None),
        }
    }

    /// Whether the named blob exists
    pub async fn exists(&self, blob_name: &str) -> BlobResult<bool> {
        self.provider
            .exists(ExistsBlobRequest::new(self.identity(blob_name)))
            .await
    }

    /// Delete the named blob; deleting an absent blob is not an error
    pub async fn delete(&self, blob_name: &str) -> BlobResult<bool> {
        self.provider
            .delete(DeleteBlobRequest::new(self.identity(blob_name)))
            .await
    }
}
