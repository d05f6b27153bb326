//! Client entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::patch::{Patch, UniqueProbe};

/// A client of the company.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    /// Unique client identifier.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email (unique across clients).
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// The sales staff user responsible for this client. Set at creation;
    /// reassignment is a gated field.
    pub owner_id: i64,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new client. Ownership is assigned from the
/// acting principal, not from the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClient {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email (unique).
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// The sales staff user who becomes responsible for the client.
    pub owner_id: i64,
}

/// Sparse update against a client. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientPatch {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New contact email.
    pub email: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New company name.
    pub company: Option<String>,
    /// New responsible sales staff user.
    pub owner_id: Option<i64>,
}

impl Patch for ClientPatch {
    type Entity = Client;

    fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.first_name.is_some() {
            fields.push("first_name");
        }
        if self.last_name.is_some() {
            fields.push("last_name");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        if self.phone.is_some() {
            fields.push("phone");
        }
        if self.company.is_some() {
            fields.push("company");
        }
        if self.owner_id.is_some() {
            fields.push("owner_id");
        }
        fields
    }

    fn unique_changes(&self, current: &Client) -> Vec<UniqueProbe> {
        let mut probes = Vec::new();
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

    fn apply_to(&self, entity: &mut Client) {
        if let Some(first_name) = &self.first_name {
            entity.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            entity.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            entity.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            entity.phone = Some(phone.clone());
        }
        if let Some(company) = &self.company {
            entity.company = Some(company.clone());
        }
        if let Some(owner_id) = self.owner_id {
            entity.owner_id = owner_id;
        }
    }
}
