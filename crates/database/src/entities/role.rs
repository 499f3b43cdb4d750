use serde::{Deserialize, Serialize};

/// A named permission tier. Roles are referenced by users and only
/// ever read by this crate; tier management lives elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl Role {
    /// Role code assigned to newly registered accounts.
    pub const DEFAULT_CODE: &'static str = "Customer";

    /// Lowercased role code, as embedded in session claims.
    pub fn code_lowercase(&self) -> String {
        self.code.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lowercase() {
        let role = Role {
            id: 2,
            code: "Customer".to_string(),
            name: "Customer".to_string(),
        };
        assert_eq!(role.code_lowercase(), "customer");
    }
}
