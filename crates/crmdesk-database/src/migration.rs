//! Database schema migration runner.

use sqlx::SqlitePool;
use tracing::info;

use crmdesk_core::error::{AppError, ErrorKind};

/// The full schema. Every statement is idempotent so the runner can be
/// invoked on every startup.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS staff_users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE COLLATE NOCASE,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    phone TEXT,
    company TEXT,
    owner_id INTEGER NOT NULL REFERENCES staff_users(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contracts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL REFERENCES clients(id),
    owner_id INTEGER NOT NULL REFERENCES staff_users(id),
    total_amount REAL NOT NULL,
    amount_due REAL NOT NULL,
    is_signed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    contract_id INTEGER NOT NULL REFERENCES contracts(id),
    client_id INTEGER NOT NULL REFERENCES clients(id),
    assignee_id INTEGER REFERENCES staff_users(id),
    starts_at TEXT NOT NULL,
    ends_at TEXT NOT NULL,
    location TEXT,
    attendees INTEGER,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_clients_owner ON clients(owner_id);
CREATE INDEX IF NOT EXISTS idx_contracts_owner ON contracts(owner_id);
CREATE INDEX IF NOT EXISTS idx_contracts_client ON contracts(client_id);
CREATE INDEX IF NOT EXISTS idx_events_assignee ON events(assignee_id);
CREATE INDEX IF NOT EXISTS idx_events_contract ON events(contract_id);
"#;

/// Run all pending database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::raw_sql(SCHEMA).execute(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Database migrations completed successfully");
    Ok(())
}
