//! # nimbus-core
//!
//! Core crate for Nimbus. Contains the blob store collaborator trait,
//! configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Nimbus crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
