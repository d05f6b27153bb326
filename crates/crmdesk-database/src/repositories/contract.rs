//! Contract repository implementation.

use chrono::Utc;
use sqlx::SqliteConnection;

use crmdesk_core::error::{AppError, ErrorKind};
use crmdesk_core::result::AppResult;
use crmdesk_entity::contract::{Contract, CreateContract};

/// Filter for contract listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractFilter {
    /// Only contracts that are not yet signed.
    pub unsigned_only: bool,
    /// Only contracts with an outstanding balance.
    pub unpaid_only: bool,
    /// Only contracts owned by this staff user.
    pub owner_id: Option<i64>,
}

/// Repository for contract CRUD and query operations.
#[derive(Debug, Clone, Copy)]
pub struct ContractRepository;

impl ContractRepository {
    /// Insert a new contract and return the stored row.
    pub async fn insert(
        conn: &mut SqliteConnection,
        contract: &CreateContract,
    ) -> AppResult<Contract> {
        let now = Utc::now();
        sqlx::query_as::<_, Contract>(
            "INSERT INTO contracts \
             (client_id, owner_id, total_amount, amount_due, is_signed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(contract.client_id)
        .bind(contract.owner_id)
        .bind(contract.total_amount)
        .bind(contract.amount_due)
        .bind(contract.is_signed)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert contract", e))
    }

    /// Find a contract by primary key.
    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Contract>> {
        sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find contract by id", e)
            })
    }

    /// List contracts matching the filter.
    pub async fn find_all(
        conn: &mut SqliteConnection,
        filter: ContractFilter,
    ) -> AppResult<Vec<Contract>> {
        let mut sql = String::from("SELECT * FROM contracts WHERE 1 = 1");
        if filter.unsigned_only {
            sql.push_str(" AND is_signed = 0");
        }
        if filter.unpaid_only {
            sql.push_str(" AND amount_due > 0");
        }
        if filter.owner_id.is_some() {
            sql.push_str(" AND owner_id = ?");
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query_as::<_, Contract>(&sql);
        if let Some(owner_id) = filter.owner_id {
            query = query.bind(owner_id);
        }
        query
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list contracts", e))
    }

    /// Persist the mutable fields of an existing contract.
    pub async fn update(conn: &mut SqliteConnection, contract: &Contract) -> AppResult<()> {
        sqlx::query(
            "UPDATE contracts \
             SET owner_id = ?, total_amount = ?, amount_due = ?, is_signed = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(contract.owner_id)
        .bind(contract.total_amount)
        .bind(contract.amount_due)
        .bind(contract.is_signed)
        .bind(contract.updated_at)
        .bind(contract.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update contract", e))?;
        Ok(())
    }
}
