//! Per-record ownership predicates.
//!
//! Role gates decide whether a principal may enter an operation at all;
//! ownership scopes decide whether it may act on one specific record.
//! Creation is not scoped — ownership is assigned there, not checked.

use crmdesk_core::error::AppError;
use crmdesk_core::result::AppResult;
use crmdesk_entity::client::Client;
use crmdesk_entity::contract::Contract;
use crmdesk_entity::event::Event;
use crmdesk_entity::staff::{Role, StaffUser};

use crate::principal::Principal;

/// Decides whether a principal may act on a specific record instance.
pub trait OwnershipScope {
    /// True when the principal may mutate this record.
    fn may_act(&self, principal: &Principal) -> bool;
}

impl OwnershipScope for Client {
    fn may_act(&self, principal: &Principal) -> bool {
        match principal.role {
            Role::Management => true,
            Role::Sales => self.owner_id == principal.id,
            Role::Support => false,
        }
    }
}

impl OwnershipScope for Contract {
    fn may_act(&self, principal: &Principal) -> bool {
        match principal.role {
            Role::Management => true,
            Role::Sales => self.owner_id == principal.id,
            Role::Support => false,
        }
    }
}

impl OwnershipScope for Event {
    fn may_act(&self, principal: &Principal) -> bool {
        match principal.role {
            Role::Management => true,
            Role::Sales => false,
            Role::Support => self.assignee_id == Some(principal.id),
        }
    }
}

impl OwnershipScope for StaffUser {
    fn may_act(&self, principal: &Principal) -> bool {
        principal.role.is_management()
    }
}

/// Evaluates the scope, failing with a `Forbidden` that names the
/// ownership gate.
pub fn require_may_act<T: OwnershipScope>(principal: &Principal, record: &T) -> AppResult<()> {
    if record.may_act(principal) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Ownership gate: role '{}' (staff id {}) may not act on this record",
            principal.role, principal.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn principal(id: i64, role: Role) -> Principal {
        Principal {
            id,
            username: format!("staff{id}"),
            display_name: format!("Staff {id}"),
            role,
        }
    }

    fn contract(owner_id: i64) -> Contract {
        Contract {
            id: 1,
            client_id: 1,
            owner_id,
            total_amount: 1000.0,
            amount_due: 500.0,
            is_signed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn event(assignee_id: Option<i64>) -> Event {
        Event {
            id: 1,
            name: "Launch party".to_string(),
            contract_id: 1,
            client_id: 1,
            assignee_id,
            starts_at: Utc::now(),
            ends_at: Utc::now(),
            location: None,
            attendees: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_sales_may_act_only_on_own_contract() {
        let seven = principal(7, Role::Sales);
        assert!(contract(7).may_act(&seven));
        assert!(!contract(9).may_act(&seven));
    }

    #[test]
    fn test_management_may_act_on_any_contract() {
        let boss = principal(1, Role::Management);
        assert!(contract(9).may_act(&boss));
    }

    #[test]
    fn test_support_may_act_only_on_assigned_event() {
        let tech = principal(5, Role::Support);
        assert!(event(Some(5)).may_act(&tech));
        assert!(!event(Some(6)).may_act(&tech));
        assert!(!event(None).may_act(&tech));
    }

    #[test]
    fn test_sales_never_acts_on_events() {
        let rep = principal(7, Role::Sales);
        assert!(!event(Some(7)).may_act(&rep));
    }

    #[test]
    fn test_require_may_act_names_the_ownership_gate() {
        let seven = principal(7, Role::Sales);
        let err = require_may_act(&seven, &contract(9)).unwrap_err();
        assert_eq!(err.kind, crmdesk_core::error::ErrorKind::Forbidden);
        assert!(err.message.contains("Ownership gate"));
    }
}
