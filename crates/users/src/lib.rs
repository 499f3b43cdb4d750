//! User identity for Doorman: registration, login, profile updates,
//! and PS256 session tokens over the credential store.

pub mod services;
pub mod types;
pub mod utils;

pub use services::{MemoryUserStore, UserRepositoryService, UserService, UserStore};
pub use types::{
    AuthenticatedUser, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    UpdateRequest, UserError, UserResponse, UserResult,
};
pub use utils::jwt::{Claims, TokenIssuer};
