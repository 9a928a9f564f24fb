//! Share capability service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_database::repositories::file::FileStore;
use nimbus_database::repositories::permission::PermissionStore;
use nimbus_entity::file::File;
use nimbus_entity::permission::{CreatePermission, Permission, ShareRole};

use crate::activity::ActivityLogger;
use crate::share::token::TokenGenerator;

/// Parameters for issuing a new share token.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueShareRequest {
    /// Role granted to the bearer.
    pub role: ShareRole,
    /// Whether the bearer may download the blob.
    pub can_download: bool,
    /// Whether the bearer may preview the file.
    pub can_preview: bool,
    /// Optional expiry instant.
    pub expires_at: Option<DateTime<Utc>>,
    /// Optional cap on the number of accesses.
    pub max_access_count: Option<i32>,
}

/// A successfully validated (and counted) share access.
#[derive(Debug, Clone, Serialize)]
pub struct ShareAccess {
    /// The shared file.
    pub file: File,
    /// Role the token grants.
    pub role: ShareRole,
    /// Download flag on the grant.
    pub can_download: bool,
    /// Preview flag on the grant.
    pub can_preview: bool,
    /// Access count after this access was counted.
    pub access_count: i32,
    /// Access cap, if any.
    pub max_access_count: Option<i32>,
}

/// Issues, resolves, and revokes capability tokens for file sharing.
///
/// Resolution counts the access atomically: a token whose counter has
/// reached its cap is refused without incrementing further, so the
/// access that lands exactly on the cap is the last one served.
pub struct ShareService {
    /// File metadata store.
    files: Arc<dyn FileStore>,
    /// Permission store.
    permissions: Arc<dyn PermissionStore>,
    /// Token generator.
    tokens: TokenGenerator,
    /// Activity logger.
    activity: ActivityLogger,
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService").finish()
    }
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        files: Arc<dyn FileStore>,
        permissions: Arc<dyn PermissionStore>,
        tokens: TokenGenerator,
        activity: ActivityLogger,
    ) -> Self {
        Self {
            files,
            permissions,
            tokens,
            activity,
        }
    }

    /// Issue a new share token for a file the actor owns.
    pub async fn issue(
        &self,
        actor_id: Uuid,
        file_id: Uuid,
        request: IssueShareRequest,
    ) -> AppResult<Permission> {
        if !request.role.is_sharable() {
            return Err(AppError::validation(
                "Only view and edit roles can be granted through a share link",
            ));
        }

        if let Some(max) = request.max_access_count {
            if max <= 0 {
                return Err(AppError::validation(
                    "Maximum access count must be positive",
                ));
            }
        }

        // Ownership doubles as the existence check; non-owners learn nothing.
        let file = self
            .files
            .find_live_owned(file_id, actor_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let permission = self
            .permissions
            .insert(&CreatePermission {
                file_id: file.id,
                user_id: None,
                role: request.role,
                share_token: self.tokens.generate(),
                can_download: request.can_download,
                can_preview: request.can_preview,
                expires_at: request.expires_at,
                max_access_count: request.max_access_count,
            })
            .await?;

        info!(
            actor_id = %actor_id,
            file_id = %file.id,
            role = ?permission.role,
            "Share token issued"
        );
        self.activity.record(
            Some(actor_id),
            Some(file.id),
            "share.issue",
            Some(format!("Shared '{}' with {:?} access", file.name, permission.role)),
        );

        Ok(permission)
    }

    /// Resolve a share token, counting the access.
    ///
    /// Unknown tokens and tokens on deleted files both surface as
    /// `NotFound` so a probe cannot distinguish the two.
    pub async fn resolve(&self, share_token: &str) -> AppResult<ShareAccess> {
        let permission = self
            .permissions
            .find_by_token(share_token)
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))?;

        if permission.is_expired(Utc::now()) {
            return Err(AppError::capability("Share link has expired"));
        }

        let consumed = self
            .permissions
            .consume_access(permission.id)
            .await?
            .ok_or_else(|| AppError::capability("Share link has reached its access limit"))?;

        let file = self
            .files
            .find_live(consumed.file_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))?;

        Ok(ShareAccess {
            file,
            role: consumed.role,
            can_download: consumed.can_download,
            can_preview: consumed.can_preview,
            access_count: consumed.access_count,
            max_access_count: consumed.max_access_count,
        })
    }

    /// Resolve a token for downloading the blob.
    pub async fn resolve_download(&self, share_token: &str) -> AppResult<ShareAccess> {
        let access = self.resolve(share_token).await?;
        if !access.can_download {
            return Err(AppError::capability("Share link does not allow downloads"));
        }
        Ok(access)
    }

    /// Resolve a token for editing; requires the edit role.
    pub async fn resolve_for_edit(&self, share_token: &str) -> AppResult<ShareAccess> {
        let access = self.resolve(share_token).await?;
        if access.role != ShareRole::Edit {
            return Err(AppError::capability("Share link does not allow edits"));
        }
        Ok(access)
    }

    /// All permissions on a file the actor owns.
    pub async fn list_for_file(&self, actor_id: Uuid, file_id: Uuid) -> AppResult<Vec<Permission>> {
        self.files
            .find_live_owned(file_id, actor_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.permissions.list_for_file(file_id).await
    }

    /// Revoke a share grant on a file the actor owns.
    pub async fn revoke(&self, actor_id: Uuid, permission_id: Uuid) -> AppResult<()> {
        let permission = self
            .permissions
            .find_by_id(permission_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        let file = self
            .files
            .find_live_owned(permission.file_id, actor_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        if permission.role == ShareRole::Owner {
            return Err(AppError::conflict("The owner grant cannot be revoked"));
        }

        self.permissions.remove(permission_id).await?;

        info!(actor_id = %actor_id, file_id = %file.id, "Share token revoked");
        self.activity.record(
            Some(actor_id),
            Some(file.id),
            "share.revoke",
            Some(format!("Revoked a share on '{}'", file.name)),
        );

        Ok(())
    }
}
