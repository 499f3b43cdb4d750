use serde::{Deserialize, Serialize};

use super::role::Role;

/// Represents one account in the credential store.
///
/// The `uuid` is assigned at creation and never changes; `username`
/// and `email` are unique across all users. The password hash is set
/// at creation and never empty afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Database primary key
    pub id: i64,
    /// Opaque public identifier, immutable once assigned
    pub uuid: String,
    /// Display name
    pub name: String,
    /// Unique username
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Adaptive one-way password hash (never the raw password)
    pub password_hash: String,
    /// Phone number
    pub phone_number: String,
    /// Role resolved alongside the user on every lookup
    pub role: Role,
    /// When the user was created
    pub created_at: String,
    /// When the user was last updated
    pub updated_at: String,
}

/// Fields required to create a new account. The store assigns the
/// uuid and resolves the role tier from its code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub role_code: String,
}

/// Change-set applied to an existing account. `None` fields are left
/// untouched; in particular an absent `password_hash` never clears
/// the stored hash.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserChanges {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.password_hash.is_none()
    }
}
