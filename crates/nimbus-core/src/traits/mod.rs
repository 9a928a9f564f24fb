//! Collaborator traits defined in `nimbus-core` and implemented elsewhere.

pub mod blob;

pub use blob::BlobStore;
