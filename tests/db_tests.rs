//! Database integration tests
//!
//! These tests verify the TursoClient credential store using in-memory and
//! file-backed SQLite.

use accounts::db::{TursoClient, UserStore};
use accounts::types::AppError;

/// Test helper to create a TursoClient with in-memory database
async fn create_test_client() -> TursoClient {
    TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database")
}

#[tokio::test]
async fn test_create_memory_client() {
    let client = create_test_client().await;
    // The schema is initialized on connect, so the users table is queryable
    let mut rows = client
        .connection()
        .query("SELECT COUNT(*) FROM users", ())
        .await
        .expect("users table should exist");
    let row = rows
        .next()
        .await
        .expect("query failed")
        .expect("count row");
    assert_eq!(row.get::<i64>(0).expect("count"), 0);
}

#[tokio::test]
async fn test_create_and_get_user() {
    let client = create_test_client().await;

    let id = client
        .create_user("a@b.com", "$argon2id$fake")
        .await
        .expect("Failed to create user");

    let by_name = client
        .get_user_by_username("a@b.com")
        .await
        .expect("query failed")
        .expect("user should exist");
    assert_eq!(by_name.id, id);
    assert_eq!(by_name.password_hash, "$argon2id$fake");
    assert!(by_name.created_at > 0);

    let by_id = client
        .get_user_by_id(id)
        .await
        .expect("query failed")
        .expect("user should exist");
    assert_eq!(by_id.username, "a@b.com");
}

#[tokio::test]
async fn test_get_missing_user() {
    let client = create_test_client().await;

    assert!(client
        .get_user_by_username("nobody@b.com")
        .await
        .expect("query failed")
        .is_none());
    assert!(client
        .get_user_by_id(42)
        .await
        .expect("query failed")
        .is_none());
}

#[tokio::test]
async fn test_usernames_are_case_sensitive() {
    let client = create_test_client().await;

    client.create_user("a@b.com", "h1").await.expect("first insert");
    client
        .create_user("A@B.com", "h2")
        .await
        .expect("differently cased username is a distinct account");
}

#[tokio::test]
async fn test_duplicate_username_is_conflict() {
    let client = create_test_client().await;

    client
        .create_user("a@b.com", "h1")
        .await
        .expect("first insert");

    let err = client
        .create_user("a@b.com", "h2")
        .await
        .expect_err("second insert should fail");

    match err {
        AppError::Conflict { message, errors } => {
            assert_eq!(message, "Username already exists");
            assert!(errors.contains_key("username"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_user() {
    let client = create_test_client().await;

    let id = client.create_user("a@b.com", "h1").await.expect("insert");
    client.delete_user(id).await.expect("delete");

    assert!(client
        .get_user_by_id(id)
        .await
        .expect("query failed")
        .is_none());

    let err = client.delete_user(id).await.expect_err("second delete");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_ids_of_deleted_users_are_not_reused() {
    let client = create_test_client().await;

    let first = client.create_user("a@b.com", "h1").await.expect("insert");
    client.delete_user(first).await.expect("delete");

    let second = client.create_user("a@b.com", "h2").await.expect("reinsert");

    assert!(second > first);
}

#[tokio::test]
async fn test_file_backed_store_persists() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("nested").join("accounts.db");
    let path = path.to_str().expect("utf-8 path");

    let id = {
        let client = TursoClient::new_local(path)
            .await
            .expect("should open file database");
        client.create_user("a@b.com", "h1").await.expect("insert")
    };

    let reopened = TursoClient::new_local(path)
        .await
        .expect("should reopen file database");
    let user = reopened
        .get_user_by_id(id)
        .await
        .expect("query failed")
        .expect("user should survive reopening");

    assert_eq!(user.username, "a@b.com");
}
