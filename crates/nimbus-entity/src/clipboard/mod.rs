//! Clipboard entry entity.

pub mod model;

pub use model::{ClipboardEntry, ClipboardOp, ItemKind, SetClipboardEntry};
