//! In-memory credential store for tests. Mirrors the repository's
//! contract including the unique-index conflicts and the
//! absence-as-`Ok(None)` lookup behavior.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use doorman_database::{NewUser, Role, StoreError, StoreResult, User, UserChanges};

use crate::services::user_service::UserStore;

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    next_id: i64,
    fail_next: Option<StoreError>,
    delay: Option<Duration>,
}

/// Test double backed by a mutex-guarded vector of users.
#[derive(Default)]
pub struct MemoryUserStore {
    state: Mutex<MemoryState>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrange for the next store call to fail with `error`.
    pub async fn fail_next(&self, error: StoreError) {
        self.state.lock().await.fail_next = Some(error);
    }

    /// Delay every store call by `delay`, for timeout tests.
    pub async fn delay_calls(&self, delay: Duration) {
        self.state.lock().await.delay = Some(delay);
    }

    /// Read back the stored password hash for assertions.
    pub async fn stored_hash(&self, uuid: &str) -> Option<String> {
        let state = self.state.lock().await;
        state
            .users
            .iter()
            .find(|u| u.uuid == uuid)
            .map(|u| u.password_hash.clone())
    }

    async fn enter(&self) -> StoreResult<tokio::sync::MutexGuard<'_, MemoryState>> {
        let delay = self.state.lock().await.delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().await;
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        Ok(state)
    }

    fn role_for(code: &str) -> Role {
        let id = if code == "Admin" { 1 } else { 2 };
        Role {
            id,
            code: code.to_string(),
            name: code.to_string(),
        }
    }
}

impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.enter().await?;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.enter().await?;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_uuid(&self, uuid: &str) -> StoreResult<Option<User>> {
        let state = self.enter().await?;
        Ok(state.users.iter().find(|u| u.uuid == uuid).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> StoreResult<User> {
        let mut state = self.enter().await?;

        if state.users.iter().any(|u| u.username == new_user.username) {
            return Err(StoreError::UsernameTaken);
        }
        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::EmailTaken);
        }

        state.next_id += 1;
        let now = Utc::now().to_rfc3339();
        let user = User {
            id: state.next_id,
            uuid: Uuid::new_v4().to_string(),
            name: new_user.name.clone(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            phone_number: new_user.phone_number.clone(),
            role: Self::role_for(&new_user.role_code),
            created_at: now.clone(),
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, uuid: &str, changes: &UserChanges) -> StoreResult<User> {
        let mut state = self.enter().await?;

        let conflict_username = changes.username.as_ref().map(|candidate| {
            state
                .users
                .iter()
                .any(|u| u.username == *candidate && u.uuid != uuid)
        });
        if conflict_username == Some(true) {
            return Err(StoreError::UsernameTaken);
        }

        let conflict_email = changes.email.as_ref().map(|candidate| {
            state
                .users
                .iter()
                .any(|u| u.email == *candidate && u.uuid != uuid)
        });
        if conflict_email == Some(true) {
            return Err(StoreError::EmailTaken);
        }

        let user = state
            .users
            .iter_mut()
            .find(|u| u.uuid == uuid)
            .ok_or_else(|| StoreError::Unavailable("row vanished during update".to_string()))?;

        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(username) = &changes.username {
            user.username = username.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(phone_number) = &changes.phone_number {
            user.phone_number = phone_number.clone();
        }
        if let Some(password_hash) = &changes.password_hash {
            user.password_hash = password_hash.clone();
        }
        user.updated_at = Utc::now().to_rfc3339();

        Ok(user.clone())
    }
}
