//! Identity service orchestrating registration, login, profile
//! updates, and read-throughs over the credential store.

use std::future::Future;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tracing::{error, info};

use doorman_config::AppConfig;
use doorman_database::{NewUser, Role, SqlitePool, StoreResult, User, UserChanges, UserRepository};

use crate::types::{
    AuthenticatedUser, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    UpdateRequest, UserError, UserResponse, UserResult,
};
use crate::utils::jwt::TokenIssuer;
use crate::utils::password::{hash_password, verify_password};

/// Credential store contract required by the identity service.
///
/// Lookups report absence as `Ok(None)`; only infrastructure faults
/// and constraint violations are errors.
pub trait UserStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_by_uuid(&self, uuid: &str) -> StoreResult<Option<User>>;
    async fn create(&self, new_user: &NewUser) -> StoreResult<User>;
    async fn update(&self, uuid: &str, changes: &UserChanges) -> StoreResult<User>;
}

impl UserStore for UserRepository {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.find_by_username(username).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.find_by_email(email).await
    }

    async fn find_by_uuid(&self, uuid: &str) -> StoreResult<Option<User>> {
        self.find_by_uuid(uuid).await
    }

    async fn create(&self, new_user: &NewUser) -> StoreResult<User> {
        self.create(new_user).await
    }

    async fn update(&self, uuid: &str, changes: &UserChanges) -> StoreResult<User> {
        self.update(uuid, changes).await
    }
}

/// Service wired to the SQLite-backed repository.
pub type UserRepositoryService = UserService<UserRepository>;

/// Service for identity operations. Stateless per request; holds only
/// read-only configuration and the store handle.
pub struct UserService<S> {
    store: S,
    token_issuer: TokenIssuer,
    token_ttl: Duration,
    store_timeout: StdDuration,
}

impl UserService<UserRepository> {
    /// Create a service over the real repository, signing tokens with
    /// the configured PS256 key material.
    pub fn new(pool: SqlitePool, config: &AppConfig) -> UserResult<Self> {
        let token_issuer =
            TokenIssuer::from_pems(&config.jwt.private_key_pem, &config.jwt.public_key_pem)?;

        Ok(Self {
            store: UserRepository::new(pool),
            token_issuer,
            token_ttl: Duration::minutes(config.jwt.expiration_minutes as i64),
            store_timeout: StdDuration::from_secs(config.database.call_timeout_seconds),
        })
    }
}

impl<S> UserService<S>
where
    S: UserStore,
{
    /// Create a service over any store implementation.
    pub fn with_store(
        store: S,
        token_issuer: TokenIssuer,
        token_ttl_minutes: u64,
        store_timeout: StdDuration,
    ) -> Self {
        Self {
            store,
            token_issuer,
            token_ttl: Duration::minutes(token_ttl_minutes as i64),
            store_timeout,
        }
    }

    /// Authenticate a username/password pair and issue a signed
    /// session token carrying the user snapshot and expiry.
    pub async fn login(&self, request: LoginRequest) -> UserResult<LoginResponse> {
        request.validate()?;

        let user = self
            .store_call(self.store.find_by_username(&request.username))
            .await?
            .ok_or(UserError::UserNotFound)?;

        if !self.verify_on_worker(request.password, user.password_hash.clone()).await? {
            return Err(UserError::PasswordIncorrect);
        }

        let expires_at = Utc::now() + self.token_ttl;
        let snapshot = UserResponse::from(&user);
        let token = self
            .token_issuer
            .issue(&snapshot, expires_at)
            .map_err(surface)?;

        info!(username = %snapshot.username, "user logged in");

        Ok(LoginResponse {
            user: snapshot,
            token,
            expires_at,
        })
    }

    /// Register a new account at the default non-privileged tier.
    /// Registration does not log the user in.
    pub async fn register(&self, request: RegisterRequest) -> UserResult<RegisterResponse> {
        request.validate()?;

        // An Ok(None) lookup means the name is free; only a real hit
        // is a conflict.
        let username_hit = self
            .store_call(self.store.find_by_username(&request.username))
            .await?;
        if username_hit.is_some() {
            return Err(UserError::UsernameExists);
        }

        let email_hit = self.store_call(self.store.find_by_email(&request.email)).await?;
        if email_hit.is_some() {
            return Err(UserError::EmailExists);
        }

        if request.password != request.confirm_password {
            return Err(UserError::PasswordMismatch);
        }

        let password_hash = self.hash_on_worker(request.password.clone()).await?;

        let new_user = NewUser {
            name: request.name.clone(),
            username: request.username.clone(),
            email: request.email.clone(),
            password_hash,
            phone_number: request.phone_number.clone(),
            role_code: Role::DEFAULT_CODE.to_string(),
        };

        // The store's unique indexes remain the authoritative guard if
        // a concurrent registration won the race since the pre-checks.
        let user = self.store_call(self.store.create(&new_user)).await?;

        info!(username = %user.username, uuid = %user.uuid, "user registered");

        Ok(RegisterResponse {
            user: UserResponse::from(&user),
        })
    }

    /// Update an existing account's profile. The identifier itself is
    /// immutable; uniqueness of the new username/email is re-checked,
    /// ignoring a hit on the account being updated.
    pub async fn update(&self, uuid: &str, request: UpdateRequest) -> UserResult<UserResponse> {
        request.validate()?;

        self.store_call(self.store.find_by_uuid(uuid))
            .await?
            .ok_or(UserError::UserNotFound)?;

        if let Some(hit) = self
            .store_call(self.store.find_by_username(&request.username))
            .await?
        {
            if hit.uuid != uuid {
                return Err(UserError::UsernameExists);
            }
        }

        if let Some(hit) = self.store_call(self.store.find_by_email(&request.email)).await? {
            if hit.uuid != uuid {
                return Err(UserError::EmailExists);
            }
        }

        // A supplied password is stored only when it differs from its
        // confirmation; an equal pair leaves the stored hash untouched,
        // and an absent change-set entry never clears the hash.
        let password_hash = match (&request.password, &request.confirm_password) {
            (Some(password), confirm) if Some(password) != confirm.as_ref() => {
                Some(self.hash_on_worker(password.clone()).await?)
            }
            _ => None,
        };

        let changes = UserChanges {
            name: Some(request.name.clone()),
            username: Some(request.username.clone()),
            email: Some(request.email.clone()),
            phone_number: Some(request.phone_number.clone()),
            password_hash,
        };

        let updated = self.store_call(self.store.update(uuid, &changes)).await?;

        info!(uuid = %uuid, "user updated");

        Ok(UserResponse::from(&updated))
    }

    /// Project the pre-authenticated caller identity. Token
    /// verification happens upstream; this is a pure read-through.
    pub fn get_user_login(&self, auth: &AuthenticatedUser) -> UserResponse {
        auth.user.clone()
    }

    /// Resolve a user by public identifier.
    pub async fn get_user_by_uuid(&self, uuid: &str) -> UserResult<UserResponse> {
        let user = self
            .store_call(self.store.find_by_uuid(uuid))
            .await?
            .ok_or(UserError::UserNotFound)?;

        Ok(UserResponse::from(&user))
    }

    /// Validate a session token against the public key.
    pub fn verify_token(&self, token: &str) -> UserResult<AuthenticatedUser> {
        let claims = self.token_issuer.verify(token)?;
        Ok(AuthenticatedUser::new(claims.user))
    }

    // Helpers

    /// Bound a store call by the configured timeout so a slow store
    /// cannot hold a request indefinitely.
    async fn store_call<T, F>(&self, fut: F) -> UserResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result.map_err(|e| surface(UserError::from(e))),
            Err(_) => Err(surface(UserError::Timeout)),
        }
    }

    /// Hashing is CPU-bound; run it on the blocking pool so it does
    /// not stall unrelated requests on the I/O runtime.
    async fn hash_on_worker(&self, password: String) -> UserResult<String> {
        tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| surface(UserError::HashingFailed(e.to_string())))?
            .map_err(surface)
    }

    async fn verify_on_worker(&self, password: String, hash: String) -> UserResult<bool> {
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| surface(UserError::HashingFailed(e.to_string())))?
            .map_err(surface)
    }
}

/// Infrastructure faults are operationally actionable and logged at
/// error severity before propagation; domain faults pass through
/// silently as expected traffic.
fn surface(err: UserError) -> UserError {
    if err.is_infrastructure() {
        error!(error = %err, "identity operation failed");
    }
    err
}
