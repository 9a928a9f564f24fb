//! Clipboard entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of item held on a clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A file.
    File,
    /// A folder.
    Folder,
}

/// Pending clipboard operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "clipboard_op", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClipboardOp {
    /// Duplicate on paste; the entry survives and may be pasted again.
    Copy,
    /// Move on paste; a successful paste consumes the entry.
    Cut,
}

/// A user's single clipboard slot.
///
/// At most one entry exists per user; setting the clipboard overwrites any
/// prior entry (last write wins).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClipboardEntry {
    /// The clipboard owner (one entry per user).
    pub user_id: Uuid,
    /// The held item.
    pub item_id: Uuid,
    /// Whether the item is a file or a folder.
    pub item_kind: ItemKind,
    /// Pending operation.
    pub operation: ClipboardOp,
    /// When the entry was created or overwritten.
    pub created_at: DateTime<Utc>,
}

/// Data required to set a user's clipboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetClipboardEntry {
    /// The clipboard owner.
    pub user_id: Uuid,
    /// The held item.
    pub item_id: Uuid,
    /// Item kind.
    pub item_kind: ItemKind,
    /// Pending operation.
    pub operation: ClipboardOp,
}
