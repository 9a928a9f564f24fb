//! Permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::ShareRole;

/// A permission row granting access to a file.
///
/// Every file carries exactly one `owner` row, created together with the
/// file. Additional rows are share capabilities: an unguessable token plus
/// a role, download/preview flags, and optional expiry and access-count
/// ceilings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// The file this permission grants access to.
    pub file_id: Uuid,
    /// The user who holds or issued this permission (None for fully
    /// anonymous public links).
    pub user_id: Option<Uuid>,
    /// Role granted.
    pub role: ShareRole,
    /// Unguessable share token.
    pub share_token: String,
    /// Whether content download is allowed.
    pub can_download: bool,
    /// Whether preview is allowed.
    pub can_preview: bool,
    /// When the token stops working (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum number of accesses (None = unlimited).
    pub max_access_count: Option<i32>,
    /// Number of accesses served so far.
    pub access_count: i32,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
}

impl Permission {
    /// Check whether the token is currently usable.
    ///
    /// Usable means not expired and not exhausted. The access that reaches
    /// `max_access_count` is still served; the next one is refused.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        if let Some(expires_at) = self.expires_at {
            if expires_at <= now {
                return false;
            }
        }
        if let Some(max) = self.max_access_count {
            if self.access_count >= max {
                return false;
            }
        }
        true
    }

    /// Check whether the token has expired (independent of access counts).
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Data required to create a new permission row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePermission {
    /// The file.
    pub file_id: Uuid,
    /// The holder/issuer.
    pub user_id: Option<Uuid>,
    /// Role granted.
    pub role: ShareRole,
    /// Share token.
    pub share_token: String,
    /// Download flag.
    pub can_download: bool,
    /// Preview flag.
    pub can_preview: bool,
    /// Expiry (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Access ceiling (None = unlimited).
    pub max_access_count: Option<i32>,
}
