//! Integration tests for the user repository against a real SQLite store.

use doorman_config::DatabaseConfig;
use doorman_database::{
    prepare_database, run_migrations, NewUser, Role, StoreError, UserChanges, UserRepository,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn create_test_store() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test_doorman.db");

    let config = DatabaseConfig {
        url: format!("sqlite://{}", db_path.display()),
        max_connections: 2,
        call_timeout_seconds: 5,
    };

    let pool = prepare_database(&config).await.expect("pool should connect");
    run_migrations(&pool).await.expect("migrations should apply");
    (pool, temp_dir)
}

fn new_test_user() -> NewUser {
    NewUser {
        name: "Alice Example".to_string(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        phone_number: "555-0100".to_string(),
        role_code: Role::DEFAULT_CODE.to_string(),
    }
}

#[tokio::test]
async fn test_create_assigns_uuid_and_resolves_role() {
    let (pool, _temp_dir) = create_test_store().await;
    let repo = UserRepository::new(pool);

    let user = repo.create(&new_test_user()).await.unwrap();

    assert!(!user.uuid.is_empty());
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role.code, "Customer");
    assert!(!user.password_hash.is_empty());
}

#[tokio::test]
async fn test_lookups_return_none_for_absent_users() {
    let (pool, _temp_dir) = create_test_store().await;
    let repo = UserRepository::new(pool);

    assert!(repo.find_by_username("ghost").await.unwrap().is_none());
    assert!(repo
        .find_by_email("ghost@example.com")
        .await
        .unwrap()
        .is_none());
    assert!(repo.find_by_uuid("no-such-uuid").await.unwrap().is_none());
}

#[tokio::test]
async fn test_lookups_find_created_user_with_role() {
    let (pool, _temp_dir) = create_test_store().await;
    let repo = UserRepository::new(pool);

    let created = repo.create(&new_test_user()).await.unwrap();

    let by_username = repo.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(by_username.uuid, created.uuid);
    assert_eq!(by_username.role.code, "Customer");

    let by_email = repo
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.uuid, created.uuid);

    let by_uuid = repo.find_by_uuid(&created.uuid).await.unwrap().unwrap();
    assert_eq!(by_uuid.username, "alice");
}

#[tokio::test]
async fn test_duplicate_username_hits_unique_index() {
    let (pool, _temp_dir) = create_test_store().await;
    let repo = UserRepository::new(pool);

    repo.create(&new_test_user()).await.unwrap();

    let mut duplicate = new_test_user();
    duplicate.email = "other@example.com".to_string();
    let result = repo.create(&duplicate).await;

    assert_eq!(result.unwrap_err(), StoreError::UsernameTaken);
}

#[tokio::test]
async fn test_duplicate_email_hits_unique_index() {
    let (pool, _temp_dir) = create_test_store().await;
    let repo = UserRepository::new(pool);

    repo.create(&new_test_user()).await.unwrap();

    let mut duplicate = new_test_user();
    duplicate.username = "alice2".to_string();
    let result = repo.create(&duplicate).await;

    assert_eq!(result.unwrap_err(), StoreError::EmailTaken);
}

#[tokio::test]
async fn test_update_applies_only_supplied_fields() {
    let (pool, _temp_dir) = create_test_store().await;
    let repo = UserRepository::new(pool);

    let created = repo.create(&new_test_user()).await.unwrap();
    let original_hash = created.password_hash.clone();

    let changes = UserChanges {
        name: Some("Alice Updated".to_string()),
        phone_number: Some("555-0199".to_string()),
        ..Default::default()
    };
    let updated = repo.update(&created.uuid, &changes).await.unwrap();

    assert_eq!(updated.name, "Alice Updated");
    assert_eq!(updated.phone_number, "555-0199");
    // Untouched columns keep their values, the hash above all.
    assert_eq!(updated.username, "alice");
    assert_eq!(updated.password_hash, original_hash);
    assert_eq!(updated.uuid, created.uuid);
}

#[tokio::test]
async fn test_update_with_empty_changeset_is_a_read() {
    let (pool, _temp_dir) = create_test_store().await;
    let repo = UserRepository::new(pool);

    let created = repo.create(&new_test_user()).await.unwrap();
    let unchanged = repo
        .update(&created.uuid, &UserChanges::default())
        .await
        .unwrap();

    assert_eq!(unchanged.updated_at, created.updated_at);
}

#[tokio::test]
async fn test_update_can_replace_password_hash() {
    let (pool, _temp_dir) = create_test_store().await;
    let repo = UserRepository::new(pool);

    let created = repo.create(&new_test_user()).await.unwrap();

    let changes = UserChanges {
        password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$bmV3c2FsdA$bmV3aGFzaA".to_string()),
        ..Default::default()
    };
    let updated = repo.update(&created.uuid, &changes).await.unwrap();

    assert_ne!(updated.password_hash, created.password_hash);
    assert!(!updated.password_hash.is_empty());
}
