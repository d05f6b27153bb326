//! Claims carried by every bearer credential.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crmdesk_core::error::AppError;
use crmdesk_entity::staff::Role;

/// Claims payload embedded in a bearer credential.
///
/// The credential is self-contained: there is no server-side session row
/// behind it, and it stays valid until `exp` passes. Signature and expiry
/// are the only things a verifier checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the staff user id, as a decimal string.
    pub sub: String,
    /// Username at the time of issuance.
    pub username: String,
    /// Role at the time of issuance.
    pub role: Role,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Parse the subject claim back into a numeric staff id.
    pub fn subject_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::invalid_credential("Credential subject is not a numeric id"))
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this credential has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
