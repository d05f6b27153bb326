//! Bearer credential creation with configurable signing and TTL.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use crmdesk_core::config::auth::AuthConfig;
use crmdesk_core::error::AppError;

use crate::principal::Principal;

use super::claims::Claims;

/// Creates signed bearer credentials (HMAC-SHA256).
///
/// One credential per login; the TTL is fixed at issuance and there is no
/// renewal path.
#[derive(Clone)]
pub struct TokenEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Credential TTL in minutes.
    ttl_minutes: i64,
}

impl std::fmt::Debug for TokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEncoder")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl TokenEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_minutes: config.token_ttl_minutes as i64,
        }
    }

    /// Issues a signed credential for the given principal.
    pub fn issue(&self, principal: &Principal) -> Result<String, AppError> {
        let exp = Utc::now() + chrono::Duration::minutes(self.ttl_minutes);

        let claims = Claims {
            sub: principal.id.to_string(),
            username: principal.username.clone(),
            role: principal.role,
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode credential: {e}")))
    }
}
