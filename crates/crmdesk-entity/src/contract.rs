//! Contract entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::patch::{Patch, UniqueProbe};

/// A contract between the company and a client.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contract {
    /// Unique contract identifier.
    pub id: i64,
    /// The client this contract belongs to.
    pub client_id: i64,
    /// The sales staff user responsible for this contract.
    pub owner_id: i64,
    /// Total contract amount.
    pub total_amount: f64,
    /// Amount still due.
    pub amount_due: f64,
    /// Whether the contract has been signed.
    pub is_signed: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContract {
    /// The client this contract belongs to.
    pub client_id: i64,
    /// The responsible sales staff user.
    pub owner_id: i64,
    /// Total contract amount.
    pub total_amount: f64,
    /// Amount still due.
    pub amount_due: f64,
    /// Whether the contract is signed at creation.
    pub is_signed: bool,
}

/// Sparse update against a contract. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractPatch {
    /// New total amount.
    pub total_amount: Option<f64>,
    /// New amount due.
    pub amount_due: Option<f64>,
    /// New signature state.
    pub is_signed: Option<bool>,
    /// New responsible sales staff user.
    pub owner_id: Option<i64>,
}

impl Patch for ContractPatch {
    type Entity = Contract;

    fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.total_amount.is_some() {
            fields.push("total_amount");
        }
        if self.amount_due.is_some() {
            fields.push("amount_due");
        }
        if self.is_signed.is_some() {
            fields.push("is_signed");
        }
        if self.owner_id.is_some() {
            fields.push("owner_id");
        }
        fields
    }

    fn unique_changes(&self, _current: &Contract) -> Vec<UniqueProbe> {
        Vec::new()
    }

    fn apply_to(&self, entity: &mut Contract) {
        if let Some(total_amount) = self.total_amount {
            entity.total_amount = total_amount;
        }
        if let Some(amount_due) = self.amount_due {
            entity.amount_due = amount_due;
        }
        if let Some(is_signed) = self.is_signed {
            entity.is_signed = is_signed;
        }
        if let Some(owner_id) = self.owner_id {
            entity.owner_id = owner_id;
        }
    }
}
