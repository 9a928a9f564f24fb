//! In-memory doubles for the store traits, with failure injection for
//! exercising saga compensation paths.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_core::traits::blob::BlobStore;
use nimbus_database::repositories::activity::ActivityStore;
use nimbus_database::repositories::clipboard::ClipboardStore;
use nimbus_database::repositories::file::FileStore;
use nimbus_database::repositories::folder::FolderStore;
use nimbus_database::repositories::permission::PermissionStore;
use nimbus_database::repositories::version::VersionStore;
use nimbus_entity::activity::{ActivityLogEntry, CreateActivityLogEntry};
use nimbus_entity::clipboard::{ClipboardEntry, SetClipboardEntry};
use nimbus_entity::file::{CreateFile, CreateFileVersion, File, FileVersion};
use nimbus_entity::folder::{CreateFolder, Folder};
use nimbus_entity::permission::{CreatePermission, Permission};
use nimbus_service::share::TokenGenerator;
use nimbus_service::{
    ActivityLogger, ClipboardService, SagaOrchestrator, ShareService, VersionLedger,
};

fn take(flag: &AtomicBool) -> bool {
    flag.swap(false, Ordering::SeqCst)
}

/// File store double.
#[derive(Default)]
pub struct MemFileStore {
    rows: Mutex<HashMap<Uuid, File>>,
    pub fail_next_insert: AtomicBool,
    pub fail_next_rename: AtomicBool,
}

impl MemFileStore {
    pub fn all(&self) -> Vec<File> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    pub fn live(&self) -> Vec<File> {
        self.all().into_iter().filter(|f| !f.is_deleted()).collect()
    }
}

#[async_trait]
impl FileStore for MemFileStore {
    async fn insert(&self, data: &CreateFile) -> AppResult<File> {
        if take(&self.fail_next_insert) {
            return Err(AppError::database("injected file insert failure"));
        }
        let file = File {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            size_bytes: data.size_bytes,
            mime_type: data.mime_type.clone(),
            blob_path: data.blob_path.clone(),
            owner_id: data.owner_id,
            folder_id: data.folder_id,
            is_public: data.is_public,
            created_at: Utc::now(),
            deleted_at: None,
        };
        self.rows.lock().unwrap().insert(file.id, file.clone());
        Ok(file)
    }

    async fn find_live(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|f| !f.is_deleted())
            .cloned())
    }

    async fn find_live_owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<File>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|f| !f.is_deleted() && f.owner_id == owner_id)
            .cloned())
    }

    async fn count_live_in_folder(&self, folder_id: Uuid) -> AppResult<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|f| !f.is_deleted() && f.folder_id == Some(folder_id))
            .count() as i64)
    }

    async fn set_folder(&self, id: Uuid, folder_id: Option<Uuid>) -> AppResult<File> {
        let mut rows = self.rows.lock().unwrap();
        let file = rows
            .get_mut(&id)
            .filter(|f| !f.is_deleted())
            .ok_or_else(|| AppError::not_found("File not found"))?;
        file.folder_id = folder_id;
        Ok(file.clone())
    }

    async fn rename(&self, id: Uuid, new_name: &str) -> AppResult<File> {
        if take(&self.fail_next_rename) {
            return Err(AppError::database("injected rename failure"));
        }
        let mut rows = self.rows.lock().unwrap();
        let file = rows
            .get_mut(&id)
            .filter(|f| !f.is_deleted())
            .ok_or_else(|| AppError::not_found("File not found"))?;
        file.name = new_name.to_string();
        Ok(file.clone())
    }

    async fn mark_deleted(&self, id: Uuid) -> AppResult<File> {
        let mut rows = self.rows.lock().unwrap();
        let file = rows
            .get_mut(&id)
            .filter(|f| !f.is_deleted())
            .ok_or_else(|| AppError::not_found("File not found"))?;
        file.deleted_at = Some(Utc::now());
        Ok(file.clone())
    }

    async fn clear_deleted(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<File>> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .get_mut(&id)
            .filter(|f| f.is_deleted() && f.owner_id == owner_id)
        {
            Some(file) => {
                file.deleted_at = None;
                Ok(Some(file.clone()))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}

/// Folder store double.
#[derive(Default)]
pub struct MemFolderStore {
    rows: Mutex<HashMap<Uuid, Folder>>,
}

impl MemFolderStore {
    pub fn all(&self) -> Vec<Folder> {
        self.rows.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl FolderStore for MemFolderStore {
    async fn insert(&self, data: &CreateFolder) -> AppResult<Folder> {
        let folder = Folder {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            owner_id: data.owner_id,
            parent_id: data.parent_id,
            created_at: Utc::now(),
            deleted_at: None,
        };
        self.rows.lock().unwrap().insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn find_live(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|f| !f.is_deleted())
            .cloned())
    }

    async fn find_live_owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|f| !f.is_deleted() && f.owner_id == owner_id)
            .cloned())
    }

    async fn count_live_children(&self, parent_id: Uuid) -> AppResult<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|f| !f.is_deleted() && f.parent_id == Some(parent_id))
            .count() as i64)
    }

    async fn ancestor_ids(&self, id: Uuid) -> AppResult<Vec<Uuid>> {
        let rows = self.rows.lock().unwrap();
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if chain.contains(&current) {
                break;
            }
            chain.push(current);
            cursor = rows.get(&current).and_then(|f| f.parent_id);
        }
        Ok(chain)
    }

    async fn set_parent(&self, id: Uuid, parent_id: Option<Uuid>) -> AppResult<Folder> {
        let mut rows = self.rows.lock().unwrap();
        let folder = rows
            .get_mut(&id)
            .filter(|f| !f.is_deleted())
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        folder.parent_id = parent_id;
        Ok(folder.clone())
    }

    async fn mark_deleted(&self, id: Uuid) -> AppResult<Folder> {
        let mut rows = self.rows.lock().unwrap();
        let folder = rows
            .get_mut(&id)
            .filter(|f| !f.is_deleted())
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        folder.deleted_at = Some(Utc::now());
        Ok(folder.clone())
    }

    async fn clear_deleted(&self, id: Uuid, owner_id: Uuid) -> AppResult<Option<Folder>> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .get_mut(&id)
            .filter(|f| f.is_deleted() && f.owner_id == owner_id)
        {
            Some(folder) => {
                folder.deleted_at = None;
                Ok(Some(folder.clone()))
            }
            None => Ok(None),
        }
    }
}

/// Permission store double.
#[derive(Default)]
pub struct MemPermissionStore {
    rows: Mutex<HashMap<Uuid, Permission>>,
    pub fail_next_insert: AtomicBool,
}

impl MemPermissionStore {
    pub fn all(&self) -> Vec<Permission> {
        self.rows.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl PermissionStore for MemPermissionStore {
    async fn insert(&self, data: &CreatePermission) -> AppResult<Permission> {
        if take(&self.fail_next_insert) {
            return Err(AppError::database("injected permission insert failure"));
        }
        let permission = Permission {
            id: Uuid::new_v4(),
            file_id: data.file_id,
            user_id: data.user_id,
            role: data.role,
            share_token: data.share_token.clone(),
            can_download: data.can_download,
            can_preview: data.can_preview,
            expires_at: data.expires_at,
            max_access_count: data.max_access_count,
            access_count: 0,
            created_at: Utc::now(),
        };
        self.rows
            .lock()
            .unwrap()
            .insert(permission.id, permission.clone());
        Ok(permission)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Permission>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|p| p.share_token == token)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Permission>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<Permission>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.file_id == file_id)
            .cloned()
            .collect())
    }

    async fn consume_access(&self, id: Uuid) -> AppResult<Option<Permission>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(permission) = rows.get_mut(&id) else {
            return Ok(None);
        };
        match permission.max_access_count {
            Some(max) if permission.access_count >= max => Ok(None),
            _ => {
                permission.access_count += 1;
                Ok(Some(permission.clone()))
            }
        }
    }

    async fn remove(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}

/// Version store double.
#[derive(Default)]
pub struct MemVersionStore {
    rows: Mutex<Vec<FileVersion>>,
    pub fail_next_insert: AtomicBool,
}

impl MemVersionStore {
    pub fn all(&self) -> Vec<FileVersion> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl VersionStore for MemVersionStore {
    async fn insert(&self, data: &CreateFileVersion) -> AppResult<FileVersion> {
        if take(&self.fail_next_insert) {
            return Err(AppError::database("injected version insert failure"));
        }
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|v| v.file_id == data.file_id && v.version_number == data.version_number)
        {
            return Err(AppError::conflict("Version number already exists"));
        }
        let version = FileVersion {
            id: Uuid::new_v4(),
            file_id: data.file_id,
            version_number: data.version_number,
            blob_path: data.blob_path.clone(),
            size_bytes: data.size_bytes,
            mime_type: data.mime_type.clone(),
            created_by: data.created_by,
            created_at: Utc::now(),
        };
        rows.push(version.clone());
        Ok(version)
    }

    async fn max_version_number(&self, file_id: Uuid) -> AppResult<Option<i32>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.file_id == file_id)
            .map(|v| v.version_number)
            .max())
    }

    async fn list_for_file(&self, file_id: Uuid) -> AppResult<Vec<FileVersion>> {
        let mut versions: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.file_id == file_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(versions)
    }

    async fn find(&self, file_id: Uuid, version_number: i32) -> AppResult<Option<FileVersion>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.file_id == file_id && v.version_number == version_number)
            .cloned())
    }

    async fn remove(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|v| v.id != id);
        Ok(rows.len() < before)
    }
}

/// Clipboard store double.
#[derive(Default)]
pub struct MemClipboardStore {
    rows: Mutex<HashMap<Uuid, ClipboardEntry>>,
}

#[async_trait]
impl ClipboardStore for MemClipboardStore {
    async fn upsert(&self, data: &SetClipboardEntry) -> AppResult<ClipboardEntry> {
        let entry = ClipboardEntry {
            user_id: data.user_id,
            item_id: data.item_id,
            item_kind: data.item_kind,
            operation: data.operation,
            created_at: Utc::now(),
        };
        self.rows
            .lock()
            .unwrap()
            .insert(entry.user_id, entry.clone());
        Ok(entry)
    }

    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Option<ClipboardEntry>> {
        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }

    async fn clear(&self, user_id: Uuid) -> AppResult<bool> {
        Ok(self.rows.lock().unwrap().remove(&user_id).is_some())
    }
}

/// Activity store double.
#[derive(Default)]
pub struct MemActivityStore {
    rows: Mutex<Vec<ActivityLogEntry>>,
}

impl MemActivityStore {
    pub fn actions(&self) -> Vec<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.action.clone())
            .collect()
    }
}

#[async_trait]
impl ActivityStore for MemActivityStore {
    async fn insert(&self, data: &CreateActivityLogEntry) -> AppResult<ActivityLogEntry> {
        let entry = ActivityLogEntry {
            id: Uuid::new_v4(),
            actor_id: data.actor_id,
            file_id: data.file_id,
            action: data.action.clone(),
            details: data.details.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(entry.clone());
        Ok(entry)
    }
}

/// Blob store double.
///
/// `fail_put_number(n)` makes the n-th `put` call (0-based, counted
/// across the store's lifetime) fail once.
#[derive(Debug, Default)]
pub struct MemBlobStore {
    blobs: Mutex<HashMap<String, Bytes>>,
    put_calls: AtomicI64,
    fail_put_at: Mutex<Option<i64>>,
}

impl MemBlobStore {
    pub fn fail_put_number(&self, n: i64) {
        *self.fail_put_at.lock().unwrap() = Some(n);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.blobs.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl BlobStore for MemBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, path: &str, data: Bytes, _mime_type: Option<&str>) -> AppResult<()> {
        let call = self.put_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_put_at.lock().unwrap() == Some(call) {
            return Err(AppError::storage("injected blob write failure"));
        }
        self.blobs.lock().unwrap().insert(path.to_string(), data);
        Ok(())
    }

    async fn get(&self, path: &str) -> AppResult<Bytes> {
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {path}")))
    }

    async fn delete(&self, paths: &[String]) -> AppResult<()> {
        let mut blobs = self.blobs.lock().unwrap();
        for path in paths {
            blobs.remove(path);
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.blobs.lock().unwrap().contains_key(path))
    }

    async fn url_for(&self, path: &str) -> AppResult<String> {
        Ok(format!("memory://{path}"))
    }
}

/// All services wired against the in-memory doubles.
pub struct TestEnv {
    pub files: Arc<MemFileStore>,
    pub folders: Arc<MemFolderStore>,
    pub permissions: Arc<MemPermissionStore>,
    pub versions: Arc<MemVersionStore>,
    pub clipboard_entries: Arc<MemClipboardStore>,
    pub activity: Arc<MemActivityStore>,
    pub blob: Arc<MemBlobStore>,
    pub ledger: Arc<VersionLedger>,
    pub shares: Arc<ShareService>,
    pub saga: Arc<SagaOrchestrator>,
    pub clipboard: ClipboardService,
}

pub fn env() -> TestEnv {
    let files = Arc::new(MemFileStore::default());
    let folders = Arc::new(MemFolderStore::default());
    let permissions = Arc::new(MemPermissionStore::default());
    let versions = Arc::new(MemVersionStore::default());
    let clipboard_entries = Arc::new(MemClipboardStore::default());
    let activity = Arc::new(MemActivityStore::default());
    let blob = Arc::new(MemBlobStore::default());

    let logger = ActivityLogger::new(Arc::clone(&activity) as Arc<dyn ActivityStore>);
    let ledger = Arc::new(VersionLedger::new(
        Arc::clone(&versions) as Arc<dyn VersionStore>
    ));
    let shares = Arc::new(ShareService::new(
        Arc::clone(&files) as Arc<dyn FileStore>,
        Arc::clone(&permissions) as Arc<dyn PermissionStore>,
        TokenGenerator::new(),
        logger.clone(),
    ));
    let saga = Arc::new(SagaOrchestrator::new(
        Arc::clone(&files) as Arc<dyn FileStore>,
        Arc::clone(&folders) as Arc<dyn FolderStore>,
        Arc::clone(&permissions) as Arc<dyn PermissionStore>,
        Arc::clone(&ledger),
        Arc::clone(&blob) as Arc<dyn BlobStore>,
        TokenGenerator::new(),
        Arc::clone(&shares),
        logger.clone(),
    ));
    let clipboard = ClipboardService::new(
        Arc::clone(&clipboard_entries) as Arc<dyn ClipboardStore>,
        Arc::clone(&files) as Arc<dyn FileStore>,
        Arc::clone(&folders) as Arc<dyn FolderStore>,
        Arc::clone(&saga),
    );

    TestEnv {
        files,
        folders,
        permissions,
        versions,
        clipboard_entries,
        activity,
        blob,
        ledger,
        shares,
        saga,
        clipboard,
    }
}

/// Upload a small text file for the given owner.
pub async fn upload_file(env: &TestEnv, owner_id: Uuid, name: &str) -> File {
    env.saga
        .upload(
            owner_id,
            nimbus_service::saga::UploadParams {
                name: name.to_string(),
                mime_type: Some("text/plain".to_string()),
                data: Bytes::from_static(b"hello world"),
                folder_id: None,
            },
        )
        .await
        .expect("upload should succeed")
        .file
}

/// Create a folder for the given owner.
pub async fn make_folder(
    env: &TestEnv,
    owner_id: Uuid,
    name: &str,
    parent_id: Option<Uuid>,
) -> Folder {
    env.folders
        .insert(&CreateFolder {
            name: name.to_string(),
            owner_id,
            parent_id,
        })
        .await
        .expect("folder insert should succeed")
}
