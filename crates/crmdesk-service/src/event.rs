//! Event workflows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crmdesk_auth::rbac::{FieldPolicy, require_role};
use crmdesk_auth::scope::require_may_act;
use crmdesk_core::error::AppError;
use crmdesk_core::result::AppResult;
use crmdesk_database::UnitOfWork;
use crmdesk_database::repositories::event::EventFilter;
use crmdesk_database::repositories::{
    ClientRepository, ContractRepository, EventRepository, StaffRepository,
};
use crmdesk_entity::event::{CreateEvent, Event, EventPatch};
use crmdesk_entity::kind::EntityKind;
use crmdesk_entity::patch::Patch;
use crmdesk_entity::staff::Role;

use crate::context::RequestContext;
use crate::merge;

/// Request to create a new event.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateEventRequest {
    /// Event name.
    pub name: String,
    /// The contract the event runs under; must be signed.
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

/// Handles event creation and updates.
#[derive(Debug, Clone)]
pub struct EventService {
    /// Field policy table.
    policy: Arc<FieldPolicy>,
}

impl EventService {
    /// Creates a new event service.
    pub fn new(policy: Arc<FieldPolicy>) -> Self {
        Self { policy }
    }

    /// Creates an event under a signed contract.
    pub async fn create(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        req: CreateEventRequest,
    ) -> AppResult<Event> {
        require_role(&ctx.principal, &[Role::Management, Role::Sales])?;

        ClientRepository::find_by_id(uow.conn(), req.client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client {} not found", req.client_id)))?;

        let contract = ContractRepository::find_by_id(uow.conn(), req.contract_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Contract {} not found", req.contract_id))
            })?;

        // Cross-entity invariant, checked at creation only.
        if !contract.is_signed {
            return Err(AppError::validation(format!(
                "Contract {} is not signed; events can only be created under a signed contract",
                contract.id
            )));
        }

        if let Some(assignee_id) = req.assignee_id {
            require_support_assignee(uow, assignee_id).await?;
        }

        let event = EventRepository::insert(
            uow.conn(),
            &CreateEvent {
                name: req.name,
                contract_id: req.contract_id,
                client_id: req.client_id,
                assignee_id: req.assignee_id,
                starts_at: req.starts_at,
                ends_at: req.ends_at,
                location: req.location,
                attendees: req.attendees,
                notes: req.notes,
            },
        )
        .await?;

        info!(
            event_id = event.id,
            contract_id = event.contract_id,
            created_by = ctx.staff_id(),
            "Event created"
        );
        Ok(event)
    }

    /// Applies a sparse patch to an event.
    pub async fn update(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        id: i64,
        patch: EventPatch,
    ) -> AppResult<Event> {
        require_role(&ctx.principal, &[Role::Management, Role::Support])?;

        let mut event = EventRepository::find_by_id(uow.conn(), id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Event {id} not found")))?;

        require_may_act(&ctx.principal, &event)?;
        self.policy
            .check(EntityKind::Event, ctx.role(), &patch.fields())?;

        if let Some(assignee_id) = patch.assignee_id {
            require_support_assignee(uow, assignee_id).await?;
        }

        merge::apply_patch(uow, EntityKind::Event, id, &mut event, &patch).await?;
        event.updated_at = Utc::now();
        EventRepository::update(uow.conn(), &event).await?;

        info!(event_id = id, updated_by = ctx.staff_id(), "Event updated");
        Ok(event)
    }

    /// Lists events with optional filters.
    pub async fn list(
        &self,
        uow: &mut UnitOfWork,
        ctx: &RequestContext,
        unassigned_only: bool,
        mine_only: bool,
    ) -> AppResult<Vec<Event>> {
        let filter = EventFilter {
            unassigned_only,
            assignee_id: mine_only.then(|| ctx.staff_id()),
        };
        EventRepository::find_all(uow.conn(), filter).await
    }
}

/// Validates that a prospective assignee exists and holds the support role.
async fn require_support_assignee(uow: &mut UnitOfWork, staff_id: i64) -> AppResult<()> {
    let staff = StaffRepository::find_by_id(uow.conn(), staff_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff user {staff_id} not found")))?;
    if staff.role != Role::Support {
        return Err(AppError::validation(format!(
            "Staff user {staff_id} does not hold the support role"
        )));
    }
    Ok(())
}
