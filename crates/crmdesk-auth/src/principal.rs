//! The acting identity behind one request.

use serde::{Deserialize, Serialize};

use crmdesk_entity::staff::{Role, StaffUser};

/// The authenticated identity performing an operation.
///
/// Loaded fresh for every request by [`crate::SessionResolver`]; never
/// cached across calls, so it always reflects the stored role assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Staff user id.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Assigned role.
    pub role: Role,
}

impl Principal {
    /// Whether this principal holds the management role.
    pub fn is_management(&self) -> bool {
        self.role.is_management()
    }
}

impl From<&StaffUser> for Principal {
    fn from(staff: &StaffUser) -> Self {
        Self {
            id: staff.id,
            username: staff.username.clone(),
            display_name: staff.display_name(),
            role: staff.role,
        }
    }
}
