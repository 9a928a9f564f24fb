//! # nimbus-service
//!
//! Business logic for Nimbus. The saga orchestrator sequences every
//! multi-step mutation across the metadata store and the blob store,
//! compensating completed steps in reverse order when a later step fails.
//! Around it sit the share capability manager, the per-user clipboard,
//! the append-only version ledger, and the best-effort activity logger.

pub mod activity;
pub mod clipboard;
pub mod saga;
pub mod share;
pub mod version;

pub use activity::ActivityLogger;
pub use clipboard::ClipboardService;
pub use saga::{ItemRecord, SagaOrchestrator};
pub use share::{IssueShareRequest, ShareAccess, ShareService};
pub use version::VersionLedger;
