//! Authentication and role gates.
//!
//! Every mutating entry point runs exactly one authentication check and one
//! role check, in that order, before any domain logic. A request with no
//! valid credential fails with `NotAuthenticated`, never `Forbidden`.

use crmdesk_core::error::AppError;
use crmdesk_core::result::AppResult;
use crmdesk_entity::staff::Role;

use crate::principal::Principal;

/// Converts a resolution outcome into an authenticated principal.
///
/// This is the only producer of `NotAuthenticated` in the system.
pub fn require_authenticated(resolved: Option<Principal>) -> AppResult<Principal> {
    resolved.ok_or_else(AppError::not_authenticated)
}

/// Admits the principal only if its role is in the allowed set.
pub fn require_role(principal: &Principal, allowed: &[Role]) -> AppResult<()> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        let allowed_names = allowed
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Err(AppError::forbidden(format!(
            "Role gate: role '{}' is not in the allowed set [{allowed_names}]",
            principal.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use crmdesk_core::error::ErrorKind;

    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            id: 1,
            username: "someone".to_string(),
            display_name: "Some One".to_string(),
            role,
        }
    }

    #[test]
    fn test_missing_principal_is_not_authenticated() {
        let err = require_authenticated(None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAuthenticated);
    }

    #[test]
    fn test_role_outside_allowed_set_is_forbidden() {
        let err = require_role(&principal(Role::Sales), &[Role::Management]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(err.message.contains("sales"));
        assert!(err.message.contains("management"));
    }

    #[test]
    fn test_role_inside_allowed_set_passes() {
        require_role(&principal(Role::Support), &[Role::Management, Role::Support]).unwrap();
    }
}
