//! User repository for credential store operations.

use crate::entities::{NewUser, Role, User, UserChanges};
use crate::types::{StoreError, StoreResult};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const USER_COLUMNS: &str = "u.id, u.uuid, u.name, u.username, u.email, u.password_hash, \
     u.phone_number, u.created_at, u.updated_at, \
     r.id AS role_id, r.code AS role_code, r.name AS role_name";

/// Repository for user records. Every lookup resolves the associated
/// role in the same query, and absence is reported as `Ok(None)`
/// rather than an error.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a user by their unique username.
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.find_by_column("u.username", username).await
    }

    /// Find a user by their unique email address.
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.find_by_column("u.email", email).await
    }

    /// Find a user by their public identifier.
    pub async fn find_by_uuid(&self, uuid: &str) -> StoreResult<Option<User>> {
        self.find_by_column("u.uuid", uuid).await
    }

    /// Create a new user, assigning a fresh uuid. The unique indexes
    /// on username and email are the authoritative guard against
    /// concurrent registrations racing past the pre-checks.
    pub async fn create(&self, new_user: &NewUser) -> StoreResult<User> {
        let now = Utc::now().to_rfc3339();
        let uuid = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO users (uuid, name, username, email, password_hash, phone_number, role_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, (SELECT id FROM roles WHERE code = ?), ?, ?)",
        )
        .bind(&uuid)
        .bind(&new_user.name)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.phone_number)
        .bind(&new_user.role_code)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;

        self.find_by_uuid(&uuid).await?.ok_or_else(|| {
            StoreError::Unavailable("failed to retrieve created user".to_string())
        })
    }

    /// Apply a change-set to an existing user. Only supplied fields
    /// are written; the password hash column is untouched unless the
    /// change-set carries a new hash.
    pub async fn update(&self, uuid: &str, changes: &UserChanges) -> StoreResult<User> {
        if changes.is_empty() {
            return self.require_by_uuid(uuid).await;
        }

        let mut query_parts = Vec::new();
        let mut values = Vec::new();

        if let Some(ref name) = changes.name {
            query_parts.push("name = ?");
            values.push(name.clone());
        }

        if let Some(ref username) = changes.username {
            query_parts.push("username = ?");
            values.push(username.clone());
        }

        if let Some(ref email) = changes.email {
            query_parts.push("email = ?");
            values.push(email.clone());
        }

        if let Some(ref phone_number) = changes.phone_number {
            query_parts.push("phone_number = ?");
            values.push(phone_number.clone());
        }

        if let Some(ref password_hash) = changes.password_hash {
            query_parts.push("password_hash = ?");
            values.push(password_hash.clone());
        }

        query_parts.push("updated_at = ?");
        values.push(Utc::now().to_rfc3339());

        let query_str = format!(
            "UPDATE users SET {} WHERE uuid = ?",
            query_parts.join(", ")
        );

        let mut query = sqlx::query(&query_str);
        for value in values {
            query = query.bind(value);
        }
        query = query.bind(uuid);

        query.execute(&self.pool).await.map_err(StoreError::from)?;

        self.require_by_uuid(uuid).await
    }

    async fn require_by_uuid(&self, uuid: &str) -> StoreResult<User> {
        self.find_by_uuid(uuid).await?.ok_or_else(|| {
            StoreError::Unavailable(format!("user {} vanished during update", uuid))
        })
    }

    async fn find_by_column(&self, column: &str, value: &str) -> StoreResult<Option<User>> {
        let query_str = format!(
            "SELECT {} FROM users u JOIN roles r ON r.id = u.role_id WHERE {} = ?",
            USER_COLUMNS, column
        );

        let row = sqlx::query(&query_str)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(row.map(map_user_row))
    }
}

fn map_user_row(row: sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        uuid: row.get("uuid"),
        name: row.get("name"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        phone_number: row.get("phone_number"),
        role: Role {
            id: row.get("role_id"),
            code: row.get("role_code"),
            name: row.get("role_name"),
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
