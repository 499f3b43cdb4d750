//! Internal utilities for the identity service.

pub mod jwt;
pub mod password;
pub mod validation;

pub use jwt::{Claims, TokenIssuer};
pub use password::{hash_password, verify_password};
pub use validation::{FieldChecks, ValidationMessage};
