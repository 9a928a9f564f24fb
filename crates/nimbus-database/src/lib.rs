//! # nimbus-database
//!
//! The metadata store collaborator. Defines the per-entity store traits the
//! services depend on and implements them against PostgreSQL with sqlx.
//!
//! Every statement here is a single-row insert/update/delete/select; the
//! store offers no cross-row transaction to its callers. Multi-step
//! consistency is the saga orchestrator's job.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
