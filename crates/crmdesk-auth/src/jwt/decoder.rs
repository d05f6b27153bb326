//! Bearer credential validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crmdesk_core::config::auth::AuthConfig;
use crmdesk_core::error::AppError;

use super::claims::Claims;

/// Validates bearer credentials against the process-wide secret.
#[derive(Clone)]
pub struct TokenDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a credential string.
    ///
    /// Expiry maps to `ExpiredCredential`; every other failure (bad
    /// signature, malformed structure, unsupported algorithm) maps to
    /// `InvalidCredential`. Callers must supply a non-empty string; absence
    /// of a credential is a caller-side condition, not a decode error.
    pub fn parse(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::expired_credential()
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::invalid_credential("Invalid credential signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::invalid_credential("Invalid credential format")
                    }
                    _ => AppError::invalid_credential(format!("Credential validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    use crmdesk_core::config::auth::AuthConfig;
    use crmdesk_core::error::ErrorKind;
    use crmdesk_entity::staff::Role;

    use crate::jwt::claims::Claims;
    use crate::jwt::encoder::TokenEncoder;
    use crate::principal::Principal;

    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            token_ttl_minutes: 60,
        }
    }

    fn test_principal() -> Principal {
        Principal {
            id: 42,
            username: "ada".to_string(),
            display_name: "Ada Lovelace".to_string(),
            role: Role::Sales,
        }
    }

    #[test]
    fn test_issue_parse_round_trip() {
        let config = test_config();
        let token = TokenEncoder::new(&config).issue(&test_principal()).unwrap();

        let claims = TokenDecoder::new(&config).parse(&token).unwrap();
        assert_eq!(claims.subject_id().unwrap(), 42);
        assert_eq!(claims.username, "ada");
        assert_eq!(claims.role, Role::Sales);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_tampered_credential_is_invalid() {
        let config = test_config();
        let token = TokenEncoder::new(&config).issue(&test_principal()).unwrap();

        // Flip the last signature character.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let err = TokenDecoder::new(&config).parse(&tampered).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = TokenEncoder::new(&test_config())
            .issue(&test_principal())
            .unwrap();

        let other = AuthConfig {
            jwt_secret: "a-different-secret".to_string(),
            token_ttl_minutes: 60,
        };
        let err = TokenDecoder::new(&other).parse(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
    }

    #[test]
    fn test_expired_credential() {
        let config = test_config();
        let claims = Claims {
            sub: "42".to_string(),
            username: "ada".to_string(),
            role: Role::Sales,
            exp: (Utc::now() - chrono::Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = TokenDecoder::new(&config).parse(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpiredCredential);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let err = TokenDecoder::new(&test_config())
            .parse("not-a-credential")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
    }
}
