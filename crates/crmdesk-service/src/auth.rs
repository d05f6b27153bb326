//! Login workflow — credential verification and token issuance.

use tracing::info;

use crmdesk_auth::jwt::TokenEncoder;
use crmdesk_auth::password::PasswordHasher;
use crmdesk_auth::principal::Principal;
use crmdesk_core::config::auth::AuthConfig;
use crmdesk_core::error::AppError;
use crmdesk_core::result::AppResult;
use crmdesk_database::UnitOfWork;
use crmdesk_database::repositories::StaffRepository;

/// Handles login: verifies a plaintext secret and issues a bearer
/// credential. The credential itself is stored by the caller.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// Password hasher/verifier.
    hasher: PasswordHasher,
    /// Credential encoder.
    encoder: TokenEncoder,
}

impl AuthService {
    /// Creates a new auth service from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            hasher: PasswordHasher::new(),
            encoder: TokenEncoder::new(config),
        }
    }

    /// Authenticates by username or email and issues a credential.
    ///
    /// The failure message is uniform: it never discloses whether the
    /// identifier or the password was wrong.
    pub async fn login(
        &self,
        uow: &mut UnitOfWork,
        identifier: &str,
        password: &str,
    ) -> AppResult<(String, Principal)> {
        let staff = StaffRepository::find_by_login(uow.conn(), identifier).await?;

        let Some(staff) = staff else {
            return Err(invalid_credentials());
        };
        if !self.hasher.verify_password(password, &staff.password_hash)? {
            return Err(invalid_credentials());
        }

        let principal = Principal::from(&staff);
        let token = self.encoder.issue(&principal)?;

        info!(staff_id = staff.id, role = %staff.role, "Login succeeded");
        Ok((token, principal))
    }
}

fn invalid_credentials() -> AppError {
    AppError::new(
        crmdesk_core::error::ErrorKind::NotAuthenticated,
        "Invalid credentials",
    )
}
