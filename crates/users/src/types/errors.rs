//! Error types for identity operations.

use crate::utils::validation::ValidationMessage;
use doorman_database::StoreError;
use thiserror::Error;

/// Typed failures surfaced by the identity service.
///
/// Domain kinds (`UserNotFound`, `UsernameExists`, ...) are expected
/// traffic; infrastructure kinds (`Store`, `HashingFailed`,
/// `SigningFailed`, `Timeout`) are logged at error severity before
/// propagation. Nothing is retried inside this crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserError {
    #[error("user not found")]
    UserNotFound,

    #[error("password incorrect")]
    PasswordIncorrect,

    #[error("username already exist")]
    UsernameExists,

    #[error("email already exist")]
    EmailExists,

    #[error("password does not match")]
    PasswordMismatch,

    #[error("validation failed")]
    ValidationFailed(Vec<ValidationMessage>),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    #[error("token signing failed: {0}")]
    SigningFailed(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("operation timed out")]
    Timeout,
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Whether this kind is an operationally actionable infrastructure
    /// fault, as opposed to expected domain traffic.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            UserError::Store(_)
                | UserError::HashingFailed(_)
                | UserError::SigningFailed(_)
                | UserError::Timeout
        )
    }

    /// Neutral text safe to show at the edge. Login failures share one
    /// message so responses cannot be used to enumerate usernames,
    /// while the typed kinds stay distinct for callers that need them.
    pub fn public_message(&self) -> &'static str {
        match self {
            UserError::UserNotFound | UserError::PasswordIncorrect => {
                "invalid username or password"
            }
            UserError::UsernameExists => "username already exist",
            UserError::EmailExists => "email already exist",
            UserError::PasswordMismatch => "password does not match",
            UserError::ValidationFailed(_) => "validation failed",
            UserError::InvalidToken(_) => "invalid token",
            _ => "internal error",
        }
    }
}

/// Fold store faults into the service taxonomy. Constraint violations
/// become the matching domain kind so a registration race surfaces the
/// same way as a pre-check hit.
impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken => UserError::UsernameExists,
            StoreError::EmailTaken => UserError::EmailExists,
            StoreError::Timeout => UserError::Timeout,
            other => UserError::Store(other),
        }
    }
}
