//! Shared harness for workflow integration tests.
//!
//! Each test gets its own in-memory SQLite database with the schema
//! migrated and drives the services directly, one unit of work per call,
//! the same way the CLI does.

use std::sync::Arc;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crmdesk_auth::password::PasswordHasher;
use crmdesk_auth::{FieldPolicy, Principal};
use crmdesk_database::repositories::StaffRepository;
use crmdesk_database::{UnitOfWork, migration};
use crmdesk_entity::staff::{CreateStaffUser, Role, StaffUser};
use crmdesk_service::RequestContext;

/// One isolated application instance backed by an in-memory database.
pub struct TestApp {
    pub pool: SqlitePool,
    pub policy: Arc<FieldPolicy>,
}

impl TestApp {
    /// Creates a fresh, migrated in-memory database.
    ///
    /// The pool is pinned to a single connection: an in-memory SQLite
    /// database exists per connection, so a second one would see an empty
    /// schema.
    pub async fn new() -> Self {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory database");
        migration::run_migrations(&pool).await.expect("migrations");
        Self {
            pool,
            policy: Arc::new(FieldPolicy::new()),
        }
    }

    /// Begins a unit of work. Callers must commit (or drop) it before
    /// beginning the next one — the pool holds a single connection.
    pub async fn uow(&self) -> UnitOfWork {
        UnitOfWork::begin(&self.pool).await.expect("transaction")
    }

    /// Inserts a staff user directly, bypassing the workflows, the way a
    /// bootstrap command would.
    pub async fn create_staff(&self, username: &str, password: &str, role: Role) -> StaffUser {
        let password_hash = PasswordHasher::new()
            .hash_password(password)
            .expect("hash password");
        let mut uow = self.uow().await;
        let staff = StaffRepository::insert(
            uow.conn(),
            &CreateStaffUser {
                username: username.to_string(),
                first_name: username.to_string(),
                last_name: "Example".to_string(),
                email: format!("{username}@example.com"),
                password_hash,
                role,
            },
        )
        .await
        .expect("insert staff");
        uow.commit().await.expect("commit");
        staff
    }

    /// Builds a request context for a staff user, as if its credential had
    /// just been resolved.
    pub fn ctx(&self, staff: &StaffUser) -> RequestContext {
        RequestContext::new(Principal::from(staff))
    }
}
