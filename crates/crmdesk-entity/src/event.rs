//! Event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::patch::{Patch, UniqueProbe};

/// An event run for a client under a signed contract.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    /// Unique event identifier.
    pub id: i64,
    /// Event name.
    pub name: String,
    /// The contract this event was created under.
    pub contract_id: i64,
    /// The client the event is run for.
    pub client_id: i64,
    /// The support staff user responsible for the event, if assigned.
    pub assignee_id: Option<i64>,
    /// Scheduled start.
    pub starts_at: DateTime<Utc>,
    /// Scheduled end.
    pub ends_at: DateTime<Utc>,
    /// Venue or address.
    pub location: Option<String>,
    /// Expected attendee count.
    pub attendees: Option<i64>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEvent {
    /// Event name.
    pub name: String,
    /// The contract the event is created under (must be signed).
    pub contract_id: i64,
    /// The client the event is run for.
    pub client_id: i64,
    /// Optional support assignee.
    pub assignee_id: Option<i64>,
    /// Scheduled start.
    pub starts_at: DateTime<Utc>,
    /// Scheduled end.
    pub ends_at: DateTime<Utc>,
    /// Venue or address.
    pub location: Option<String>,
    /// Expected attendee count.
    pub attendees: Option<i64>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Sparse update against an event. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    /// New event name.
    pub name: Option<String>,
    /// New scheduled start.
    pub starts_at: Option<DateTime<Utc>>,
    /// New scheduled end.
    pub ends_at: Option<DateTime<Utc>>,
    /// New venue or address.
    pub location: Option<String>,
    /// New attendee count.
    pub attendees: Option<i64>,
    /// New notes.
    pub notes: Option<String>,
    /// New support assignee.
    pub assignee_id: Option<i64>,
}

impl Patch for EventPatch {
    type Entity = Event;

    fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.starts_at.is_some() {
            fields.push("starts_at");
        }
        if self.ends_at.is_some() {
            fields.push("ends_at");
        }
        if self.location.is_some() {
            fields.push("location");
        }
        if self.attendees.is_some() {
            fields.push("attendees");
        }
        if self.notes.is_some() {
            fields.push("notes");
        }
        if self.assignee_id.is_some() {
            fields.push("assignee_id");
        }
        fields
    }

    fn unique_changes(&self, _current: &Event) -> Vec<UniqueProbe> {
        Vec::new()
    }

    fn apply_to(&self, entity: &mut Event) {
        if let Some(name) = &self.name {
            entity.name = name.clone();
        }
        if let Some(starts_at) = self.starts_at {
            entity.starts_at = starts_at;
        }
        if let Some(ends_at) = self.ends_at {
            entity.ends_at = ends_at;
        }
        if let Some(location) = &self.location {
            entity.location = Some(location.clone());
        }
        if let Some(attendees) = self.attendees {
            entity.attendees = Some(attendees);
        }
        if let Some(notes) = &self.notes {
            entity.notes = Some(notes.clone());
        }
        if let Some(assignee_id) = self.assignee_id {
            entity.assignee_id = Some(assignee_id);
        }
    }
}
