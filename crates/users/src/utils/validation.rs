//! Input-shape validation.
//!
//! Field checks collect [`ValidationMessage`]s keyed by field name.
//! The tag-to-template table is an immutable value built once at
//! startup; validation rules never mutate it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One failed field check, shaped for edge serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationMessage {
    pub field: String,
    pub message: String,
}

/// Message templates per validation tag. `%s` is replaced by the
/// field name.
static MESSAGE_TEMPLATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("required", "Field %s is required"),
        ("email", "Field %s is not a valid email"),
    ])
});

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email regex is valid")
});

/// Render the message for a validation tag on a field, falling back
/// to a generic message for unknown tags.
pub fn message_for(tag: &str, field: &str) -> ValidationMessage {
    let message = match MESSAGE_TEMPLATES.get(tag) {
        Some(template) => template.replacen("%s", field, 1),
        None => format!("something went wrong on {} : {}", field, tag),
    };

    ValidationMessage {
        field: field.to_string(),
        message,
    }
}

/// Collects field failures across one request.
#[derive(Debug, Default)]
pub struct FieldChecks {
    messages: Vec<ValidationMessage>,
}

impl FieldChecks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.messages.push(message_for("required", field));
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !value.trim().is_empty() && !EMAIL_REGEX.is_match(value) {
            self.messages.push(message_for("email", field));
        }
        self
    }

    pub fn finish(self) -> Result<(), Vec<ValidationMessage>> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(self.messages)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_check() {
        let mut checks = FieldChecks::new();
        checks.required("username", "alice");
        assert!(checks.finish().is_ok());

        let mut checks = FieldChecks::new();
        checks.required("username", "   ");
        let messages = checks.finish().unwrap_err();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].field, "username");
        assert_eq!(messages[0].message, "Field username is required");
    }

    #[test]
    fn test_email_check() {
        let mut checks = FieldChecks::new();
        checks.email("email", "alice@example.com");
        assert!(checks.finish().is_ok());

        let mut checks = FieldChecks::new();
        checks.email("email", "not-an-email");
        let messages = checks.finish().unwrap_err();
        assert_eq!(messages[0].message, "Field email is not a valid email");
    }

    #[test]
    fn test_empty_email_reports_required_not_format() {
        let mut checks = FieldChecks::new();
        checks.required("email", "").email("email", "");
        let messages = checks.finish().unwrap_err();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "Field email is required");
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        let message = message_for("min", "password");
        assert_eq!(message.message, "something went wrong on password : min");
    }
}
