//! Uniqueness probes for constrained fields.
//!
//! Every field the schema marks unique is probed through this one function,
//! so create and update paths agree on what "taken" means (case-insensitive
//! match on another row).

use sqlx::SqliteConnection;

use crmdesk_core::error::{AppError, ErrorKind};
use crmdesk_core::result::AppResult;
use crmdesk_entity::kind::EntityKind;

/// Check whether `value` is already stored in the unique `field` of a
/// different row of the given entity's table.
///
/// `exclude_id` names the row being updated, which is allowed to keep its
/// own value; pass `None` when creating.
pub async fn value_taken_by_other(
    conn: &mut SqliteConnection,
    kind: EntityKind,
    field: &'static str,
    value: &str,
    exclude_id: Option<i64>,
) -> AppResult<bool> {
    let sql = match (kind, field) {
        (EntityKind::Staff, "username") => {
            "SELECT COUNT(*) FROM staff_users \
             WHERE LOWER(username) = LOWER(?) AND id <> IFNULL(?, 0)"
        }
        (EntityKind::Staff, "email") => {
            "SELECT COUNT(*) FROM staff_users \
             WHERE LOWER(email) = LOWER(?) AND id <> IFNULL(?, 0)"
        }
        (EntityKind::Client, "email") => {
            "SELECT COUNT(*) FROM clients \
             WHERE LOWER(email) = LOWER(?) AND id <> IFNULL(?, 0)"
        }
        _ => {
            return Err(AppError::internal(format!(
                "No uniqueness rule for {kind}.{field}"
            )));
        }
    };

    let count: i64 = sqlx::query_scalar(sql)
        .bind(value)
        .bind(exclude_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to probe uniqueness of {kind}.{field}"),
                e,
            )
        })?;

    Ok(count > 0)
}
