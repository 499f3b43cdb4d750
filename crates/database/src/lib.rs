//! Doorman Database Crate
//!
//! Credential store access for the Doorman identity backend: connection
//! management, schema migrations, and the user repository. Lookups
//! resolve the associated role alongside the user, report absence as
//! `Ok(None)`, and surface infrastructure faults as [`StoreError`].

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

// Re-export repositories
pub use repos::UserRepository;

// Re-export entities and result types
pub use entities::{NewUser, Role, User, UserChanges};
pub use types::{StoreError, StoreResult};

// Re-export the pool type so downstream crates do not need a direct
// sqlx dependency just to hold a handle.
pub use sqlx::SqlitePool;
