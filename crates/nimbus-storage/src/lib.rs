//! # nimbus-storage
//!
//! Blob store collaborator implementations. The [`BlobStore`] trait itself
//! lives in `nimbus-core`; this crate provides the local filesystem backend
//! (default) and an S3-compatible backend behind the `s3` feature.
//!
//! [`BlobStore`]: nimbus_core::traits::blob::BlobStore

pub mod providers;
