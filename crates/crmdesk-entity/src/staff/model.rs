//! Staff user entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::patch::{Patch, UniqueProbe};

use super::role::Role;

/// A staff member of the back office.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffUser {
    /// Unique staff identifier.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email (unique across staff).
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Assigned role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl StaffUser {
    /// Human-readable display name.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data required to create a new staff user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaffUser {
    /// Desired username (unique).
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email (unique).
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: Role,
}

/// Sparse update against a staff user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffPatch {
    /// New username.
    pub username: Option<String>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New contact email.
    pub email: Option<String>,
    /// New role assignment.
    pub role: Option<Role>,
}

impl Patch for StaffPatch {
    type Entity = StaffUser;

    fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.username.is_some() {
            fields.push("username");
        }
        if self.first_name.is_some() {
            fields.push("first_name");
        }
        if self.last_name.is_some() {
            fields.push("last_name");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        if self.role.is_some() {
            fields.push("role");
        }
        fields
    }

    fn unique_changes(&self, current: &StaffUser) -> Vec<UniqueProbe> {
        let mut probes = Vec::new();
        if let Some(username) = &self.username {
            if !username.eq_ignore_ascii_case(&current.username) {
                probes.push(UniqueProbe {
                    field: "username",
                    value: username.clone(),
                });
            }
        }
        if let Some(email) = &self.email {
            if !email.eq_ignore_ascii_case(&current.email) {
                probes.push(UniqueProbe {
                    field: "email",
                    value: email.clone(),
                });
            }
        }
        probes
    }

    fn apply_to(&self, entity: &mut StaffUser) {
        if let Some(username) = &self.username {
            entity.username = username.clone();
        }
        if let Some(first_name) = &self.first_name {
            entity.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            entity.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            entity.email = email.clone();
        }
        if let Some(role) = self.role {
            entity.role = role;
        }
    }
}
