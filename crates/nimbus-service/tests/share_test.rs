//! Share capability tests: issuing, counted resolution, expiry, and
//! revocation.

mod support;

use chrono::{Duration, Utc};
use uuid::Uuid;

use nimbus_core::error::ErrorKind;
use nimbus_entity::clipboard::ItemKind;
use nimbus_entity::permission::ShareRole;
use nimbus_service::IssueShareRequest;

use support::{env, upload_file, TestEnv};

fn view_request() -> IssueShareRequest {
    IssueShareRequest {
        role: ShareRole::View,
        can_download: true,
        can_preview: true,
        expires_at: None,
        max_access_count: None,
    }
}

async fn shared_file(env: &TestEnv, owner: Uuid, request: IssueShareRequest) -> String {
    let file = upload_file(env, owner, "shared.txt").await;
    env.shares
        .issue(owner, file.id, request)
        .await
        .unwrap()
        .share_token
}

#[tokio::test]
async fn test_issue_requires_ownership() {
    let env = env();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let file = upload_file(&env, owner, "mine.txt").await;

    let err = env
        .shares
        .issue(stranger, file.id, view_request())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_issue_rejects_owner_role() {
    let env = env();
    let owner = Uuid::new_v4();
    let file = upload_file(&env, owner, "mine.txt").await;

    let mut request = view_request();
    request.role = ShareRole::Owner;
    let err = env.shares.issue(owner, file.id, request).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_issue_rejects_nonpositive_access_cap() {
    let env = env();
    let owner = Uuid::new_v4();
    let file = upload_file(&env, owner, "mine.txt").await;

    let mut request = view_request();
    request.max_access_count = Some(0);
    let err = env.shares.issue(owner, file.id, request).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_resolve_counts_accesses_up_to_the_cap() {
    let env = env();
    let owner = Uuid::new_v4();
    let mut request = view_request();
    request.max_access_count = Some(2);
    let token = shared_file(&env, owner, request).await;

    let first = env.shares.resolve(&token).await.unwrap();
    assert_eq!(first.access_count, 1);

    // The access that reaches the cap is still served.
    let second = env.shares.resolve(&token).await.unwrap();
    assert_eq!(second.access_count, 2);

    let err = env.shares.resolve(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Capability);

    // Refusal does not inflate the counter.
    let stored = env
        .permissions
        .all()
        .into_iter()
        .find(|p| p.share_token == token)
        .unwrap();
    assert_eq!(stored.access_count, 2);
}

#[tokio::test]
async fn test_resolve_unlimited_token() {
    let env = env();
    let owner = Uuid::new_v4();
    let token = shared_file(&env, owner, view_request()).await;

    for expected in 1..=3 {
        let access = env.shares.resolve(&token).await.unwrap();
        assert_eq!(access.access_count, expected);
    }
}

#[tokio::test]
async fn test_resolve_unknown_token_is_not_found() {
    let env = env();
    let err = env.shares.resolve("no-such-token").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_resolve_expired_token_does_not_count() {
    let env = env();
    let owner = Uuid::new_v4();
    let mut request = view_request();
    request.expires_at = Some(Utc::now() - Duration::hours(1));
    let token = shared_file(&env, owner, request).await;

    let err = env.shares.resolve(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Capability);

    let stored = env
        .permissions
        .all()
        .into_iter()
        .find(|p| p.share_token == token)
        .unwrap();
    assert_eq!(stored.access_count, 0);
}

#[tokio::test]
async fn test_resolve_on_deleted_file_is_not_found() {
    let env = env();
    let owner = Uuid::new_v4();
    let file = upload_file(&env, owner, "shared.txt").await;
    let token = env
        .shares
        .issue(owner, file.id, view_request())
        .await
        .unwrap()
        .share_token;

    env.saga
        .soft_delete(owner, ItemKind::File, file.id)
        .await
        .unwrap();

    // Same error as an unknown token; deletion is not observable.
    let err = env.shares.resolve(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_resolve_download_requires_the_flag() {
    let env = env();
    let owner = Uuid::new_v4();
    let mut request = view_request();
    request.can_download = false;
    let token = shared_file(&env, owner, request).await;

    let err = env.shares.resolve_download(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Capability);

    assert!(env.shares.resolve(&token).await.is_ok());
}

#[tokio::test]
async fn test_resolve_for_edit_requires_edit_role() {
    let env = env();
    let owner = Uuid::new_v4();
    let token = shared_file(&env, owner, view_request()).await;

    let err = env.shares.resolve_for_edit(&token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Capability);
}

#[tokio::test]
async fn test_revoke_disables_the_token() {
    let env = env();
    let owner = Uuid::new_v4();
    let file = upload_file(&env, owner, "shared.txt").await;
    let grant = env
        .shares
        .issue(owner, file.id, view_request())
        .await
        .unwrap();

    env.shares.revoke(owner, grant.id).await.unwrap();

    let err = env.shares.resolve(&grant.share_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_revoke_requires_ownership() {
    let env = env();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let file = upload_file(&env, owner, "shared.txt").await;
    let grant = env
        .shares
        .issue(owner, file.id, view_request())
        .await
        .unwrap();

    let err = env.shares.revoke(stranger, grant.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_owner_grant_cannot_be_revoked() {
    let env = env();
    let owner = Uuid::new_v4();
    let file = upload_file(&env, owner, "mine.txt").await;

    let owner_grant = env
        .permissions
        .all()
        .into_iter()
        .find(|p| p.file_id == file.id && p.role == ShareRole::Owner)
        .unwrap();

    let err = env.shares.revoke(owner, owner_grant.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_list_for_file_requires_ownership() {
    let env = env();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let file = upload_file(&env, owner, "mine.txt").await;
    env.shares
        .issue(owner, file.id, view_request())
        .await
        .unwrap();

    let listed = env.shares.list_for_file(owner, file.id).await.unwrap();
    assert_eq!(listed.len(), 2);

    let err = env
        .shares
        .list_for_file(stranger, file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
