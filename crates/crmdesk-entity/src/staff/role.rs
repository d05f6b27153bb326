//! Staff role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available to staff users.
///
/// The set is closed: every staff user holds exactly one of these, and a
/// role is never inferred from anything other than the stored assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office management; administers staff and reassigns ownership.
    Management,
    /// Sales staff; owns the clients and contracts it created.
    Sales,
    /// Support staff; runs the events assigned to it.
    Support,
}

impl Role {
    /// Check if this role is management.
    pub fn is_management(&self) -> bool {
        matches!(self, Self::Management)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Management => "management",
            Self::Sales => "sales",
            Self::Support => "support",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = crmdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "management" => Ok(Self::Management),
            "sales" => Ok(Self::Sales),
            "support" => Ok(Self::Support),
            _ => Err(crmdesk_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: management, sales, support"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("management".parse::<Role>().unwrap(), Role::Management);
        assert_eq!("SALES".parse::<Role>().unwrap(), Role::Sales);
        assert!("commercial".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Support).unwrap(), "\"support\"");
        let parsed: Role = serde_json::from_str("\"management\"").unwrap();
        assert_eq!(parsed, Role::Management);
    }
}
