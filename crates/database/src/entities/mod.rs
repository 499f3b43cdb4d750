//! Domain entities persisted by the credential store.

pub mod role;
pub mod user;

pub use role::Role;
pub use user::{NewUser, User, UserChanges};
