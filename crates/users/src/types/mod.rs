//! Shared types for the identity service.

pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::{UserError, UserResult};
pub use requests::{LoginRequest, RegisterRequest, UpdateRequest};
pub use responses::{AuthenticatedUser, LoginResponse, RegisterResponse, UserResponse};
