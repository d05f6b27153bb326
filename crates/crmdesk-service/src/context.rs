//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crmdesk_auth::Principal;
use crmdesk_entity::staff::Role;

/// Context for the current authenticated request.
///
/// Built once per CLI action after session resolution and passed into
/// every service method, so each operation knows *who* is acting without
/// hidden call-signature coupling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated principal.
    pub principal: Principal,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context for a resolved principal.
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            request_time: Utc::now(),
        }
    }

    /// The acting staff user's id.
    pub fn staff_id(&self) -> i64 {
        self.principal.id
    }

    /// The acting staff user's role.
    pub fn role(&self) -> Role {
        self.principal.role
    }

    /// Returns whether the current principal is management.
    pub fn is_management(&self) -> bool {
        self.principal.is_management()
    }
}
