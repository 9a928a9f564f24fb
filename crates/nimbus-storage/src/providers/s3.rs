//! S3-compatible blob store (requires the `s3` feature).

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::debug;

use nimbus_core::config::S3BlobConfig;
use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;

/// Blob store backed by an S3-compatible object store.
///
/// Content URLs are presigned GET requests with a configured lifetime.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    url_expiry: Duration,
}

impl S3BlobStore {
    /// Create a new S3 blob store from configuration.
    ///
    /// Explicit credentials in the config take precedence; otherwise the
    /// ambient AWS credential chain is used.
    pub async fn new(config: &S3BlobConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("S3 bucket name is required"));
        }

        tracing::info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 blob store"
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(true);

        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(&config.endpoint);
        }
        if !config.access_key.is_empty() {
            builder = builder.credentials_provider(aws_sdk_s3::config::Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "nimbus-config",
            ));
        }

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            url_expiry: Duration::from_secs(config.url_expiry_seconds),
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map(|_| true)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("S3 health check failed: {e}"),
                    e,
                )
            })
    }

    async fn put(&self, path: &str, data: Bytes, mime_type: Option<&str>) -> AppResult<()> {
        let mut req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(ByteStream::from(data.clone()));

        if let Some(mime) = mime_type {
            req = req.content_type(mime);
        }

        req.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {path}"),
                e,
            )
        })?;

        debug!(path, bytes = data.len(), "Wrote blob");
        Ok(())
    }

    async fn get(&self, path: &str) -> AppResult<Bytes> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    AppError::not_found(format!("Blob not found: {path}"))
                } else {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to read blob: {path}"),
                        e,
                    )
                }
            })?;

        let data = resp.body.collect().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to collect blob body: {path}"),
                e,
            )
        })?;
        Ok(data.into_bytes())
    }

    async fn delete(&self, paths: &[String]) -> AppResult<()> {
        // S3 DeleteObject is idempotent; missing keys succeed.
        for path in paths {
            self.client
                .delete_object()
                .bucket(&self.bucket)
                .key(path)
                .send()
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to delete blob: {path}"),
                        e,
                    )
                })?;
            debug!(path = path.as_str(), "Deleted blob");
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to stat blob: {path}"),
                e,
            )),
        }
    }

    async fn url_for(&self, path: &str) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(self.url_expiry).map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Invalid presigning expiry", e)
        })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to presign blob URL: {path}"),
                    e,
                )
            })?;

        Ok(presigned.uri().to_string())
    }
}
