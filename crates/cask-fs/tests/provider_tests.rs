use std::io::Cursor;
use std::sync::Arc;

use cask_core::{
    BlobError, BlobIdentity, BlobProvider, BlobResult, CancellationToken, DeleteBlobRequest,
    ExistsBlobRequest, GetBlobRequest, SaveBlobRequest,
};
use cask_fs::{DefaultFilePathCalculator, FileSystemBlobProvider};
use tempfile::TempDir;
use tokio::io::AsyncReadExt;

fn provider(dir: &TempDir) -> FileSystemBlobProvider {
    FileSystemBlobProvider::new(Arc::new(DefaultFilePathCalculator::with_base_path(
        dir.path(),
    )))
}

async fn save(
    provider: &FileSystemBlobProvider,
    identity: BlobIdentity,
    content: &[u8],
    override_existing: bool,
) -> BlobResult<()> {
    provider
        .save(
            SaveBlobRequest::new(identity, Cursor::new(content.to_vec()))
                .with_override(override_existing),
        )
        .await
}

async fn get_bytes(
    provider: &FileSystemBlobProvider,
    identity: BlobIdentity,
) -> BlobResult<Option<Vec<u8>>> {
    match provider.get(GetBlobRequest::new(identity)).await? {
        Some(mut stream) => {
            let mut content = Vec::new();
            stream.read_to_end(&mut content).await.unwrap();
            Ok(Some(content))
        }
        None => Ok(None),
    }
}

#[tokio::test]
async fn test_save_get_exists_delete_lifecycle() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);
    let identity = BlobIdentity::new("docs", "a.txt");

    assert!(!provider
        .exists(ExistsBlobRequest::new(identity.clone()))
        .await
        .unwrap());

    save(&provider, identity.clone(), b"hello", false).await.unwrap();

    assert!(provider
        .exists(ExistsBlobRequest::new(identity.clone()))
        .await
        .unwrap());
    assert_eq!(
        get_bytes(&provider, identity.clone()).await.unwrap(),
        Some(b"hello".to_vec())
    );

    // Non-override save onto an existing blob fails and leaves it intact
    let err = save(&provider, identity.clone(), b"world", false)
        .await
        .unwrap_err();
    assert!(matches!(err, BlobError::AlreadyExists { .. }));
    assert_eq!(
        get_bytes(&provider, identity.clone()).await.unwrap(),
        Some(b"hello".to_vec())
    );

    // Override replaces the content entirely
    save(&provider, identity.clone(), b"world", true).await.unwrap();
    assert_eq!(
        get_bytes(&provider, identity.clone()).await.unwrap(),
        Some(b"world".to_vec())
    );

    assert!(provider
        .delete(DeleteBlobRequest::new(identity.clone()))
        .await
        .unwrap());
    assert!(get_bytes(&provider, identity.clone()).await.unwrap().is_none());
    assert!(!provider
        .exists(ExistsBlobRequest::new(identity.clone()))
        .await
        .unwrap());

    // Delete is idempotent
    assert!(provider
        .delete(DeleteBlobRequest::new(identity))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_empty_blob_round_trip() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);
    let identity = BlobIdentity::new("docs", "empty.bin");

    save(&provider, identity.clone(), b"", false).await.unwrap();
    assert_eq!(
        get_bytes(&provider, identity).await.unwrap(),
        Some(Vec::new())
    );
}

#[tokio::test]
async fn test_override_truncates_longer_content() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);
    let identity = BlobIdentity::new("docs", "shrink.bin");

    save(&provider, identity.clone(), b"a long first version", false)
        .await
        .unwrap();
    save(&provider, identity.clone(), b"short", true).await.unwrap();
    assert_eq!(
        get_bytes(&provider, identity).await.unwrap(),
        Some(b"short".to_vec())
    );
}

#[tokio::test]
async fn test_nested_blob_name_creates_directories() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);
    let identity = BlobIdentity::new("media", "images/2024/avatar.png");

    save(&provider, identity.clone(), b"png-bytes", false)
        .await
        .unwrap();
    assert_eq!(
        get_bytes(&provider, identity).await.unwrap(),
        Some(b"png-bytes".to_vec())
    );

    // Re-saving a sibling exercises the idempotent directory creation
    let sibling = BlobIdentity::new("media", "images/2024/banner.png");
    save(&provider, sibling.clone(), b"more-bytes", false)
        .await
        .unwrap();
    assert!(provider
        .exists(ExistsBlobRequest::new(sibling))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_scope_isolates_identities() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);
    let unscoped = BlobIdentity::new("docs", "a.txt");
    let scoped = BlobIdentity::new("docs", "a.txt").with_scope("tenant-1");

    save(&provider, unscoped.clone(), b"host copy", false)
        .await
        .unwrap();
    save(&provider, scoped.clone(), b"tenant copy", false)
        .await
        .unwrap();

    assert_eq!(
        get_bytes(&provider, unscoped).await.unwrap(),
        Some(b"host copy".to_vec())
    );
    assert_eq!(
        get_bytes(&provider, scoped).await.unwrap(),
        Some(b"tenant copy".to_vec())
    );
}

#[tokio::test]
async fn test_exists_is_false_for_directories() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);

    save(
        &provider,
        BlobIdentity::new("docs", "reports/q1.txt"),
        b"q1",
        false,
    )
    .await
    .unwrap();

    // "reports" resolves to the directory holding q1.txt
    assert!(!provider
        .exists(ExistsBlobRequest::new(BlobIdentity::new("docs", "reports")))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_get_of_directory_path_is_none() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);

    save(
        &provider,
        BlobIdentity::new("docs", "reports/q1.txt"),
        b"q1",
        false,
    )
    .await
    .unwrap();

    // "reports" resolves to the directory holding q1.txt; get must agree
    // with exists and treat it as absent
    let identity = BlobIdentity::new("docs", "reports");
    assert!(!provider
        .exists(ExistsBlobRequest::new(identity.clone()))
        .await
        .unwrap());
    assert!(provider
        .get(GetBlobRequest::new(identity))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_get_absent_is_none_not_error() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);

    let result = provider
        .get(GetBlobRequest::new(BlobIdentity::new("docs", "missing.txt")))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_invalid_identity_rejected_before_io() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);

    for identity in [
        BlobIdentity::new("", "a.txt"),
        BlobIdentity::new("docs", ""),
        BlobIdentity::new("docs", "../escape.txt"),
        BlobIdentity::new("docs", "/etc/passwd"),
        BlobIdentity::new("a/b", "x.txt"),
    ] {
        let err = save(&provider, identity, b"x", false).await.unwrap_err();
        assert!(matches!(err, BlobError::InvalidIdentity(_)));
    }

    // Nothing was written under the base path
    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    assert!(entries.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn test_pre_cancelled_save_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);
    let identity = BlobIdentity::new("docs", "cancelled.txt");

    let token = CancellationToken::new();
    token.cancel();

    let err = provider
        .save(
            SaveBlobRequest::new(identity.clone(), Cursor::new(b"never written".to_vec()))
                .with_cancellation(token),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BlobError::Cancelled { .. }));
    assert!(!provider
        .exists(ExistsBlobRequest::new(identity))
        .await
        .unwrap());
}

/// Yields one chunk, then cancels the token and stalls.
struct CancelAfterFirstChunk {
    token: CancellationToken,
    served: bool,
}

impl tokio::io::AsyncRead for CancelAfterFirstChunk {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        if !self.served {
            self.served = true;
            buf.put_slice(b"partial");
            return std::task::Poll::Ready(Ok(()));
        }
        self.token.cancel();
        cx.waker().wake_by_ref();
        std::task::Poll::Pending
    }
}

#[tokio::test]
async fn test_cancellation_aborts_copy_and_leaves_partial_file() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);
    let identity = BlobIdentity::new("docs", "interrupted.bin");

    let token = CancellationToken::new();
    let stream = CancelAfterFirstChunk {
        token: token.clone(),
        served: false,
    };

    let err = provider
        .save(SaveBlobRequest::new(identity.clone(), stream).with_cancellation(token))
        .await
        .unwrap_err();
    assert!(matches!(err, BlobError::Cancelled { .. }));

    // The destination is left as-is: a partial file, not rolled back
    assert!(provider
        .exists(ExistsBlobRequest::new(identity))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_concurrent_non_override_saves_have_one_winner() {
    let dir = TempDir::new().unwrap();
    let provider = provider(&dir);
    let identity = BlobIdentity::new("docs", "contested.txt");

    let (first, second) = tokio::join!(
        save(&provider, identity.clone(), b"writer one", false),
        save(&provider, identity.clone(), b"writer two", false),
    );

    let winners = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one non-override save must win");
    let loser = if first.is_err() { first } else { second };
    assert!(matches!(
        loser.unwrap_err(),
        BlobError::AlreadyExists { .. }
    ));

    // The surviving content belongs to the winner, whole and uncorrupted
    let content = get_bytes(&provider, identity).await.unwrap().unwrap();
    assert!(content == b"writer one" || content == b"writer two");
}
