//! Share role levels.

use serde::{Deserialize, Serialize};

/// Role granted by a permission row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShareRole {
    /// Full control. Exactly one owner row exists per live file.
    Owner,
    /// Read-only access through a share token.
    View,
    /// Read access plus versioned edits through a share token.
    Edit,
}

impl ShareRole {
    /// Whether this role may be granted through a share token.
    ///
    /// Ownership is established at upload/copy time and never issued as
    /// a share.
    pub fn is_sharable(&self) -> bool {
        matches!(self, Self::View | Self::Edit)
    }
}
