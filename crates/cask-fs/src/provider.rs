//! Filesystem blob provider

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use cask_core::async_trait::async_trait;
use cask_core::{
    BlobError, BlobProvider, BlobResult, BlobStream, DeleteBlobRequest, ExistsBlobRequest,
    GetBlobRequest, SaveBlobRequest,
};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use crate::path_calculator::FilePathCalculator;

const COPY_BUF_SIZE: usize = 64 * 1024;

/// Stores blobs as plain files under paths resolved by an injected
/// [`FilePathCalculator`].
///
/// Holds no mutable state of its own; the filesystem is the coordination
/// point for concurrent callers. Non-overriding saves rely on the atomic
/// exclusive-create open to guarantee exactly one winner under races.
pub struct FileSystemBlobProvider {
    path_calculator: Arc<dyn FilePathCalculator>,
}

impl FileSystemBlobProvider {
    pub fn new(path_calculator: Arc<dyn FilePathCalculator>) -> Self {
        Self { path_calculator }
    }
}

#[async_trait]
impl BlobProvider for FileSystemBlobProvider {
    async fn save(&self, mut request: SaveBlobRequest) -> BlobResult<()> {
        let identity = request.identity.clone();
        if request.cancellation.is_cancelled() {
            return Err(BlobError::cancelled(&identity));
        }

        let path = self.path_calculator.calculate(&identity)?;

        // Early exit only; the create_new open below is the authoritative
        // enforcement under concurrent writers.
        if !request.override_existing && file_exists(&path).await {
            return Err(BlobError::already_exists(&identity));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::io(&identity, e))?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true);
        if request.override_existing {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = match options.open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(BlobError::already_exists(&identity));
            }
            Err(e) => return Err(BlobError::io(&identity, e)),
        };

        let mut buf = vec![0u8; COPY_BUF_SIZE];
        let mut written: u64 = 0;
        loop {
            let read = tokio::select! {
                biased;
                _ = request.cancellation.cancelled() => {
                    return Err(BlobError::cancelled(&identity));
                }
                read = request.stream.read(&mut buf) => {
                    read.map_err(|e| BlobError::io(&identity, e))?
                }
            };
            if read == 0 {
                break;
            }
            file.write_all(&buf[..read])
                .await
                .map_err(|e| BlobError::io(&identity, e))?;
            written += read as u64;
        }

        file.flush().await.map_err(|e| BlobError::io(&identity, e))?;
        file.sync_all()
            .await
            .map_err(|e| BlobError::io(&identity, e))?;

        debug!("SAVE {} ({} bytes)", identity, written);
        Ok(())
    }

    async fn get(&self, request: GetBlobRequest) -> BlobResult<Option<BlobStream>> {
        let identity = &request.identity;
        if request.cancellation.is_cancelled() {
            return Err(BlobError::cancelled(identity));
        }

        let path = self.path_calculator.calculate(identity)?;

        debug!("GET {}", identity);

        // Only regular files are blobs; a directory at the resolved path
        // (a nested blob's parent) is absent, matching `exists`.
        if !file_exists(&path).await {
            return Ok(None);
        }

        match fs::File::open(&path).await {
            Ok(file) => Ok(Some(Box::new(file) as BlobStream)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BlobError::io(identity, e)),
        }
    }

    async fn exists(&self, request: ExistsBlobRequest) -> BlobResult<bool> {
        let identity = &request.identity;
        if request.cancellation.is_cancelled() {
            return Err(BlobError::cancelled(identity));
        }

        let path = self.path_calculator.calculate(identity)?;
        Ok(file_exists(&path).await)
    }

    async fn delete(&self, request: DeleteBlobRequest) -> BlobResult<bool> {
        let identity = &request.identity;
        if request.cancellation.is_cancelled() {
            return Err(BlobError::cancelled(identity));
        }

        let path = self.path_calculator.calculate(identity)?;

        debug!("DELETE {}", identity);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(BlobError::io(identity, e)),
        }
    }
}

/// Whether a regular file exists at `path`; directories do not count and
/// unreadable paths are treated as absent
async fn file_exists(path: &Path) -> bool {
    match fs::metadata(path).await {
        Ok(metadata) => metadata.is_file(),
        Err(_) => false,
    }
}
