//! Repository implementations over the connection pool.

pub mod user_repository;

pub use user_repository::UserRepository;
