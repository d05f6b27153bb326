//! Transaction-scoped unit of work.
//!
//! Every mutating workflow receives a [`UnitOfWork`] from its caller and
//! runs all of its statements on it. Commit and rollback are explicit;
//! dropping an uncommitted unit rolls the whole transaction back, so no
//! partial mutation can ever reach the database.

use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, SqliteConnection, Transaction};

use crmdesk_core::error::{AppError, ErrorKind};
use crmdesk_core::result::AppResult;

/// One database transaction, passed explicitly through a workflow call.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    /// Begin a new transaction on the pool.
    pub async fn begin(pool: &SqlitePool) -> AppResult<Self> {
        let tx = pool.begin().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to begin transaction: {e}"),
                e,
            )
        })?;
        Ok(Self { tx })
    }

    /// The connection to run statements on.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    /// Commit the transaction, making every statement in it durable.
    pub async fn commit(self) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to commit transaction: {e}"),
                e,
            )
        })
    }

    /// Explicitly roll the transaction back. Dropping the unit has the same
    /// effect; this form surfaces rollback errors.
    pub async fn rollback(self) -> AppResult<()> {
        self.tx.rollback().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to roll back transaction: {e}"),
                e,
            )
        })
    }
}
