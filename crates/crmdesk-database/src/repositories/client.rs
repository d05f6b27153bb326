//! Client repository implementation.

use chrono::Utc;
use sqlx::SqliteConnection;

use crmdesk_core::error::{AppError, ErrorKind};
use crmdesk_core::result::AppResult;
use crmdesk_entity::client::{Client, CreateClient};

/// Repository for client CRUD and query operations.
#[derive(Debug, Clone, Copy)]
pub struct ClientRepository;

impl ClientRepository {
    /// Insert a new client and return the stored row.
    pub async fn insert(conn: &mut SqliteConnection, client: &CreateClient) -> AppResult<Client> {
        let now = Utc::now();
        sqlx::query_as::<_, Client>(
            "INSERT INTO clients \
             (first_name, last_name, email, phone, company, owner_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.company)
        .bind(client.owner_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert client", e))
    }

    /// Find a client by primary key.
    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Client>> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find client by id", e)
            })
    }

    /// List all clients, optionally restricted to one owner.
    pub async fn find_all(
        conn: &mut SqliteConnection,
        owner_id: Option<i64>,
    ) -> AppResult<Vec<Client>> {
        let query = match owner_id {
            Some(owner_id) => {
                sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE owner_id = ? ORDER BY id")
                    .bind(owner_id)
            }
            None => sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY id"),
        };
        query
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list clients", e))
    }

    /// Persist the mutable fields of an existing client.
    pub async fn update(conn: &mut SqliteConnection, client: &Client) -> AppResult<()> {
        sqlx::query(
            "UPDATE clients \
             SET first_name = ?, last_name = ?, email = ?, phone = ?, company = ?, \
                 owner_id = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.company)
        .bind(client.owner_id)
        .bind(client.updated_at)
        .bind(client.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update client", e))?;
        Ok(())
    }
}
