//! Event repository implementation.

use chrono::Utc;
use sqlx::SqliteConnection;

use crmdesk_core::error::{AppError, ErrorKind};
use crmdesk_core::result::AppResult;
use crmdesk_entity::event::{CreateEvent, Event};

/// Filter for event listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilter {
    /// Only events with no support assignee.
    pub unassigned_only: bool,
    /// Only events assigned to this staff user.
    pub assignee_id: Option<i64>,
}

/// Repository for event CRUD and query operations.
#[derive(Debug, Clone, Copy)]
pub struct EventRepository;

impl EventRepository {
    /// Insert a new event and return the stored row.
    pub async fn insert(conn: &mut SqliteConnection, event: &CreateEvent) -> AppResult<Event> {
        let now = Utc::now();
        sqlx::query_as::<_, Event>(
            "INSERT INTO events \
             (name, contract_id, client_id, assignee_id, starts_at, ends_at, \
              location, attendees, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&event.name)
        .bind(event.contract_id)
        .bind(event.client_id)
        .bind(event.assignee_id)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(&event.location)
        .bind(event.attendees)
        .bind(&event.notes)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert event", e))
    }

    /// Find an event by primary key.
    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Event>> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find event by id", e)
            })
    }

    /// List events matching the filter.
    pub async fn find_all(
        conn: &mut SqliteConnection,
        filter: EventFilter,
    ) -> AppResult<Vec<Event>> {
        let mut sql = String::from("SELECT * FROM events WHERE 1 = 1");
        if filter.unassigned_only {
            sql.push_str(" AND assignee_id IS NULL");
        }
        if filter.assignee_id.is_some() {
            sql.push_str(" AND assignee_id = ?");
        }
        sql.push_str(" ORDER BY starts_at, id");

        let mut query = sqlx::query_as::<_, Event>(&sql);
        if let Some(assignee_id) = filter.assignee_id {
            query = query.bind(assignee_id);
        }
        query
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list events", e))
    }

    /// Persist the mutable fields of an existing event.
    pub async fn update(conn: &mut SqliteConnection, event: &Event) -> AppResult<()> {
        sqlx::query(
            "UPDATE events \
             SET name = ?, assignee_id = ?, starts_at = ?, ends_at = ?, \
                 location = ?, attendees = ?, notes = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&event.name)
        .bind(event.assignee_id)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(&event.location)
        .bind(event.attendees)
        .bind(&event.notes)
        .bind(event.updated_at)
        .bind(event.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update event", e))?;
        Ok(())
    }
}
