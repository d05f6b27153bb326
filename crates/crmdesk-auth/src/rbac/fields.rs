//! Per-entity, per-role field policies for updates.
//!
//! The mutation rule for every (entity, role) pair lives in this one table
//! instead of being repeated inline in each workflow.

use std::collections::{HashMap, HashSet};

use crmdesk_core::error::AppError;
use crmdesk_core::result::AppResult;
use crmdesk_entity::kind::EntityKind;
use crmdesk_entity::staff::Role;

/// Which fields each role may set when updating each entity.
///
/// A (entity, role) pair absent from the table allows nothing: any patch
/// from that role is rejected on its first field.
#[derive(Debug, Clone)]
pub struct FieldPolicy {
    /// (entity kind, role) → set of settable field names.
    allowed: HashMap<(EntityKind, Role), HashSet<&'static str>>,
}

impl FieldPolicy {
    /// Creates the default policy table.
    pub fn new() -> Self {
        let mut allowed: HashMap<(EntityKind, Role), HashSet<&'static str>> = HashMap::new();

        // Clients: sales owns the business fields; only management may
        // reassign ownership.
        allowed.insert(
            (EntityKind::Client, Role::Management),
            ["first_name", "last_name", "email", "phone", "company", "owner_id"].into(),
        );
        allowed.insert(
            (EntityKind::Client, Role::Sales),
            ["first_name", "last_name", "email", "phone", "company"].into(),
        );

        // Contracts: same ownership rule as clients.
        allowed.insert(
            (EntityKind::Contract, Role::Management),
            ["total_amount", "amount_due", "is_signed", "owner_id"].into(),
        );
        allowed.insert(
            (EntityKind::Contract, Role::Sales),
            ["total_amount", "amount_due", "is_signed"].into(),
        );

        // Events: management only reassigns; support runs the event but
        // cannot hand it to someone else.
        allowed.insert((EntityKind::Event, Role::Management), ["assignee_id"].into());
        allowed.insert(
            (EntityKind::Event, Role::Support),
            ["name", "starts_at", "ends_at", "location", "attendees", "notes"].into(),
        );

        // Staff accounts are management-administered.
        allowed.insert(
            (EntityKind::Staff, Role::Management),
            ["username", "first_name", "last_name", "email", "role"].into(),
        );

        Self { allowed }
    }

    /// Checks every field of a submitted patch against the role's allowed
    /// set. The first disallowed field rejects the whole patch — nothing is
    /// silently dropped.
    pub fn check(
        &self,
        kind: EntityKind,
        role: Role,
        patch_fields: &[&'static str],
    ) -> AppResult<()> {
        let allowed = self.allowed.get(&(kind, role));
        for field in patch_fields {
            let permitted = allowed.is_some_and(|set| set.contains(field));
            if !permitted {
                return Err(AppError::field_not_allowed(field, role));
            }
        }
        Ok(())
    }

    /// The allowed field set for one (entity, role) pair, if any.
    pub fn allowed_fields(&self, kind: EntityKind, role: Role) -> Option<&HashSet<&'static str>> {
        self.allowed.get(&(kind, role))
    }
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crmdesk_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_support_cannot_reassign_event() {
        let policy = FieldPolicy::new();
        // The whole patch is rejected even though the other fields are fine.
        let err = policy
            .check(EntityKind::Event, Role::Support, &["name", "assignee_id"])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::FieldNotAllowed);
        assert!(err.message.contains("assignee_id"));
        assert!(err.message.contains("support"));
    }

    #[test]
    fn test_management_may_only_reassign_event() {
        let policy = FieldPolicy::new();
        policy
            .check(EntityKind::Event, Role::Management, &["assignee_id"])
            .unwrap();
        let err = policy
            .check(EntityKind::Event, Role::Management, &["name"])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::FieldNotAllowed);
    }

    #[test]
    fn test_sales_cannot_reassign_client_ownership() {
        let policy = FieldPolicy::new();
        policy
            .check(EntityKind::Client, Role::Sales, &["email", "phone"])
            .unwrap();
        let err = policy
            .check(EntityKind::Client, Role::Sales, &["owner_id"])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::FieldNotAllowed);
    }

    #[test]
    fn test_unlisted_pair_allows_nothing() {
        let policy = FieldPolicy::new();
        let err = policy
            .check(EntityKind::Event, Role::Sales, &["name"])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::FieldNotAllowed);
    }

    #[test]
    fn test_empty_patch_always_passes() {
        let policy = FieldPolicy::new();
        policy.check(EntityKind::Contract, Role::Support, &[]).unwrap();
    }
}
