//! Signed session tokens.
//!
//! Tokens are signed with PS256 so any holder of the public key can
//! validate them without the issuer's private key. The expiry instant
//! lives inside the signed payload; tampering with it invalidates the
//! signature, and expiry is the only end-of-life mechanism.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::types::errors::UserError;
use crate::types::responses::UserResponse;

/// Claims embedded in a session token: a snapshot of the user plus
/// the absolute expiry instant.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub user: UserResponse,
    pub exp: i64,
}

/// Issues and validates PS256-signed session tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    /// Build an issuer from PEM-encoded RSA key material.
    pub fn from_pems(private_key_pem: &str, public_key_pem: &str) -> Result<Self, UserError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| UserError::SigningFailed(format!("invalid private key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| UserError::SigningFailed(format!("invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
        })
    }

    /// Sign a claims payload expiring at the given instant.
    pub fn issue(
        &self,
        user: &UserResponse,
        expires_at: DateTime<Utc>,
    ) -> Result<String, UserError> {
        let claims = Claims {
            user: user.clone(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::PS256), &claims, &self.encoding_key)
            .map_err(|e| UserError::SigningFailed(e.to_string()))
    }

    /// Validate a token signature and expiry, returning the embedded
    /// claims. Only the public key is consulted.
    pub fn verify(&self, token: &str) -> Result<Claims, UserError> {
        let mut validation = Validation::new(Algorithm::PS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| UserError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    // Throwaway 2048-bit RSA pair shared with the integration tests.
    const TEST_PRIVATE_KEY_PEM: &str = include_str!("../../tests/keys/test_rsa.pem");
    const TEST_PUBLIC_KEY_PEM: &str = include_str!("../../tests/keys/test_rsa.pub.pem");

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::from_pems(TEST_PRIVATE_KEY_PEM, TEST_PUBLIC_KEY_PEM).unwrap()
    }

    fn test_user() -> UserResponse {
        UserResponse {
            uuid: "7cf8a5c7-69e3-4c14-9c4b-57d3db8f42a1".to_string(),
            name: "Alice".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            phone_number: "555-0100".to_string(),
            role: "customer".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let issuer = test_issuer();
        let expires_at = Utc::now() + Duration::minutes(15);

        let token = issuer.issue(&test_user(), expires_at).unwrap();
        assert!(!token.is_empty());

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.user.uuid, test_user().uuid);
        assert_eq!(claims.user.role, "customer");
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_expired_token_fails_validation() {
        let issuer = test_issuer();
        let expired_at = Utc::now() - Duration::minutes(1);

        let token = issuer.issue(&test_user(), expired_at).unwrap();
        let result = issuer.verify(&token);

        assert!(matches!(result, Err(UserError::InvalidToken(_))));
    }

    #[test]
    fn test_tampered_token_fails_validation() {
        let issuer = test_issuer();
        let expires_at = Utc::now() + Duration::minutes(15);

        let token = issuer.issue(&test_user(), expires_at).unwrap();
        let mut tampered = token.clone();
        tampered.truncate(token.len() - 4);
        tampered.push_str("AAAA");

        assert!(issuer.verify(&tampered).is_err());
    }

    #[test]
    fn test_invalid_key_material_is_a_signing_error() {
        let result = TokenIssuer::from_pems("not a pem", TEST_PUBLIC_KEY_PEM);
        assert!(matches!(result, Err(UserError::SigningFailed(_))));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let issuer = test_issuer();
        let result = issuer.verify("invalid.jwt.token");
        assert!(matches!(result, Err(UserError::InvalidToken(_))));
    }
}
