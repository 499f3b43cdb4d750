//! Credentials-in-flight request types.
//!
//! These are transient input shapes; they are validated and
//! transformed before anything touches the credential store.

use serde::{Deserialize, Serialize};

use crate::types::UserError;
use crate::utils::validation::FieldChecks;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), UserError> {
        let mut checks = FieldChecks::new();
        checks
            .required("username", &self.username)
            .required("password", &self.password);
        checks.finish().map_err(UserError::ValidationFailed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub phone_number: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), UserError> {
        let mut checks = FieldChecks::new();
        checks
            .required("name", &self.name)
            .required("username", &self.username)
            .required("password", &self.password)
            .required("confirmPassword", &self.confirm_password)
            .required("email", &self.email)
            .email("email", &self.email)
            .required("phoneNumber", &self.phone_number);
        checks.finish().map_err(UserError::ValidationFailed)
    }
}

/// Profile update. Password and its confirmation are optional; when
/// absent the stored hash is left untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
    pub email: String,
    pub phone_number: String,
}

impl UpdateRequest {
    pub fn validate(&self) -> Result<(), UserError> {
        let mut checks = FieldChecks::new();
        checks
            .required("name", &self.name)
            .required("username", &self.username)
            .required("email", &self.email)
            .email("email", &self.email)
            .required("phoneNumber", &self.phone_number);
        checks.finish().map_err(UserError::ValidationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            username: "alice".to_string(),
            password: "Secret1!".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing = LoginRequest {
            username: String::new(),
            password: "Secret1!".to_string(),
        };
        assert!(matches!(
            missing.validate(),
            Err(UserError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_register_request_validates_email_format() {
        let request = RegisterRequest {
            name: "Alice".to_string(),
            username: "alice".to_string(),
            password: "Secret1!".to_string(),
            confirm_password: "Secret1!".to_string(),
            email: "not-an-email".to_string(),
            phone_number: "555-0100".to_string(),
        };

        let Err(UserError::ValidationFailed(messages)) = request.validate() else {
            panic!("expected validation failure");
        };
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].field, "email");
    }

    #[test]
    fn test_update_request_allows_absent_password() {
        let request = UpdateRequest {
            name: "Alice".to_string(),
            username: "alice".to_string(),
            password: None,
            confirm_password: None,
            email: "alice@example.com".to_string(),
            phone_number: "555-0100".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_uses_camel_case_wire_names() {
        let json = r#"{
            "name": "Alice",
            "username": "alice",
            "password": "Secret1!",
            "confirmPassword": "Secret1!",
            "email": "alice@example.com",
            "phoneNumber": "555-0100"
        }"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.confirm_password, "Secret1!");
        assert_eq!(request.phone_number, "555-0100");
    }
}
