//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobStorageConfig {
    /// Which provider to use: `"local"` or `"s3"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Maximum upload size in bytes (default 1 GB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Local filesystem provider configuration.
    #[serde(default)]
    pub local: LocalBlobConfig,
    /// S3-compatible provider configuration.
    #[serde(default)]
    pub s3: S3BlobConfig,
}

impl Default for BlobStorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            max_upload_size_bytes: default_max_upload(),
            local: LocalBlobConfig::default(),
            s3: S3BlobConfig::default(),
        }
    }
}

/// Local filesystem blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalBlobConfig {
    /// Root path for locally stored blobs.
    #[serde(default = "default_local_root")]
    pub root_path: String,
    /// Public base URL that blob paths are appended to when building
    /// content URLs.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for LocalBlobConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct S3BlobConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3 bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID (empty = ambient credentials).
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Lifetime of presigned download URLs in seconds.
    #[serde(default = "default_url_expiry")]
    pub url_expiry_seconds: u64,
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_max_upload() -> u64 {
    1024 * 1024 * 1024
}

fn default_local_root() -> String {
    "data/blobs".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/content".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_url_expiry() -> u64 {
    900
}
