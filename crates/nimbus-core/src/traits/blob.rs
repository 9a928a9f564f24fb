//! Blob store trait for pluggable content storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for the blob store collaborator.
///
/// Blobs are addressed by opaque path strings; the metadata store holds the
/// paths, the blob store holds the bytes. Implementations exist for the
/// local filesystem and S3. The trait is defined here in `nimbus-core` and
/// implemented in `nimbus-storage`.
///
/// The blob store and the metadata store fail independently; callers that
/// write to both must compensate on partial failure.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write bytes at the given path, overwriting any existing blob.
    async fn put(&self, path: &str, data: Bytes, mime_type: Option<&str>) -> AppResult<()>;

    /// Read the blob at the given path into memory.
    async fn get(&self, path: &str) -> AppResult<Bytes>;

    /// Delete the blobs at the given paths.
    ///
    /// Deleting a path that does not exist is not an error; compensating
    /// actions may retry deletes that already ran.
    async fn delete(&self, paths: &[String]) -> AppResult<()>;

    /// Check whether a blob exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Build a URL that resolves to the blob's content (public or
    /// time-boxed signed, depending on the provider).
    async fn url_for(&self, path: &str) -> AppResult<String>;
}
