//! Database migration command.

use crmdesk_core::config::AppConfig;
use crmdesk_core::error::AppError;
use crmdesk_database::migration;

use crate::output;

/// Create or update the database schema
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let pool = super::open_pool(config).await?;
    migration::run_migrations(&pool).await?;
    output::print_success("Database schema is up to date");
    Ok(())
}
