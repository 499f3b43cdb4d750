//! Response types for identity operations.
//!
//! Responses are projections of store records; none of them ever
//! carries the password hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use doorman_database::User;

/// Public snapshot of one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub uuid: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    /// Lowercased role code
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
}

/// Caller identity attached by an upstream token-verification layer.
///
/// A typed carrier instead of an untyped request-context bag: a
/// missing or malformed identity fails where the token is verified,
/// not with a crash inside a read-through.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: UserResponse,
}

impl AuthenticatedUser {
    pub fn new(user: UserResponse) -> Self {
        Self { user }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            uuid: user.uuid.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            role: user.role.code_lowercase(),
        }
    }
}
