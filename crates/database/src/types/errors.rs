//! Error types for credential store access.

use thiserror::Error;

/// Faults surfaced by the credential store.
///
/// Absence of a record is never an error here; lookups return
/// `Ok(None)` so callers branch on a real signal instead of a
/// nullable success value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("username already taken")]
    UsernameTaken,

    #[error("email already taken")]
    EmailTaken,

    #[error("store call timed out")]
    Timeout,
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                if message.contains("UNIQUE constraint failed") {
                    if message.contains("users.email") {
                        StoreError::EmailTaken
                    } else {
                        StoreError::UsernameTaken
                    }
                } else {
                    StoreError::Unavailable(message)
                }
            }
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StoreError::UsernameTaken.to_string(),
            "username already taken"
        );
        assert_eq!(StoreError::EmailTaken.to_string(), "email already taken");
        assert_eq!(
            StoreError::Unavailable("connection reset".to_string()).to_string(),
            "store unavailable: connection reset"
        );
        assert_eq!(StoreError::Timeout.to_string(), "store call timed out");
    }
}
