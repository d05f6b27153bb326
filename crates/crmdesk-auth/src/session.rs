//! Stored credential → live principal resolution.

use sqlx::SqliteConnection;
use tracing::warn;

use crmdesk_core::result::AppResult;
use crmdesk_database::repositories::StaffRepository;

use crate::jwt::TokenDecoder;
use crate::principal::Principal;

/// Turns a stored bearer credential into a live [`Principal`].
///
/// This is the single place "am I logged in" is decided. `Ok(None)` means
/// not authenticated — no credential stored, a rejected credential, or an
/// identity deleted since issuance. Decode failures are logged with their
/// distinct kind (expired vs. invalid) but deliberately collapse to `None`
/// for the caller. Only unexpected database faults surface as `Err`.
#[derive(Debug, Clone)]
pub struct SessionResolver {
    /// Credential decoder.
    decoder: TokenDecoder,
}

impl SessionResolver {
    /// Creates a resolver around a configured decoder.
    pub fn new(decoder: TokenDecoder) -> Self {
        Self { decoder }
    }

    /// Resolve a stored credential, if any, into a principal.
    ///
    /// The principal is loaded fresh from the store on every call; there is
    /// no cross-call identity cache, so role changes and deletions take
    /// effect immediately.
    pub async fn resolve(
        &self,
        conn: &mut SqliteConnection,
        stored: Option<&str>,
    ) -> AppResult<Option<Principal>> {
        let Some(token) = stored else {
            return Ok(None);
        };
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }

        let claims = match self.decoder.parse(token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(kind = %e.kind, "Stored credential rejected: {}", e.message);
                return Ok(None);
            }
        };

        let staff_id = match claims.subject_id() {
            Ok(id) => id,
            Err(e) => {
                warn!(kind = %e.kind, "Stored credential rejected: {}", e.message);
                return Ok(None);
            }
        };

        let staff = StaffRepository::find_by_id(conn, staff_id).await?;
        Ok(staff.as_ref().map(Principal::from))
    }
}
