//! Staff user repository implementation.

use chrono::Utc;
use sqlx::SqliteConnection;

use crmdesk_core::error::{AppError, ErrorKind};
use crmdesk_core::result::AppResult;
use crmdesk_entity::staff::{CreateStaffUser, Role, StaffUser};

/// Repository for staff user CRUD and query operations.
#[derive(Debug, Clone, Copy)]
pub struct StaffRepository;

impl StaffRepository {
    /// Insert a new staff user and return the stored row.
    pub async fn insert(
        conn: &mut SqliteConnection,
        staff: &CreateStaffUser,
    ) -> AppResult<StaffUser> {
        let now = Utc::now();
        sqlx::query_as::<_, StaffUser>(
            "INSERT INTO staff_users \
             (username, first_name, last_name, email, password_hash, role, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&staff.username)
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.password_hash)
        .bind(staff.role)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert staff user", e))
    }

    /// Find a staff user by primary key.
    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<StaffUser>> {
        sqlx::query_as::<_, StaffUser>("SELECT * FROM staff_users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find staff user by id", e)
            })
    }

    /// Find a staff user by username or email (case-insensitive). Used by
    /// the login workflow, which accepts either identifier.
    pub async fn find_by_login(
        conn: &mut SqliteConnection,
        identifier: &str,
    ) -> AppResult<Option<StaffUser>> {
        sqlx::query_as::<_, StaffUser>(
            "SELECT * FROM staff_users \
             WHERE LOWER(username) = LOWER(?) OR LOWER(email) = LOWER(?)",
        )
        .bind(identifier)
        .bind(identifier)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find staff user by login", e)
        })
    }

    /// List all staff users, optionally filtered by role.
    pub async fn find_all(
        conn: &mut SqliteConnection,
        role: Option<Role>,
    ) -> AppResult<Vec<StaffUser>> {
        let query = match role {
            Some(role) => sqlx::query_as::<_, StaffUser>(
                "SELECT * FROM staff_users WHERE role = ? ORDER BY id",
            )
            .bind(role),
            None => sqlx::query_as::<_, StaffUser>("SELECT * FROM staff_users ORDER BY id"),
        };
        query
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list staff users", e))
    }

    /// Count all staff users.
    pub async fn count(conn: &mut SqliteConnection) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM staff_users")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count staff users", e))
    }

    /// Persist the mutable fields of an existing staff user.
    pub async fn update(conn: &mut SqliteConnection, staff: &StaffUser) -> AppResult<()> {
        sqlx::query(
            "UPDATE staff_users \
             SET username = ?, first_name = ?, last_name = ?, email = ?, role = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&staff.username)
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(staff.role)
        .bind(staff.updated_at)
        .bind(staff.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update staff user", e))?;
        Ok(())
    }

    /// Replace a staff user's password hash.
    pub async fn update_password(
        conn: &mut SqliteConnection,
        id: i64,
        password_hash: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE staff_users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update password", e)
            })?;
        Ok(())
    }

    /// Delete a staff user by primary key.
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM staff_users WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete staff user", e)
            })?;
        Ok(())
    }
}
