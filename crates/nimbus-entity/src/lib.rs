//! # nimbus-entity
//!
//! Domain entity models for Nimbus: files, folders, file versions,
//! permissions (share capabilities), clipboard entries, and the activity
//! log. All row types derive `sqlx::FromRow` and serde traits.

pub mod activity;
pub mod clipboard;
pub mod file;
pub mod folder;
pub mod permission;
