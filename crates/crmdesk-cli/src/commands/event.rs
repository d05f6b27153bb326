//! Event management commands.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crmdesk_auth::FieldPolicy;
use crmdesk_core::config::AppConfig;
use crmdesk_core::error::AppError;
use crmdesk_database::UnitOfWork;
use crmdesk_entity::event::EventPatch;
use crmdesk_service::{CreateEventRequest, EventService};

use crate::output::{self, OutputFormat};

/// Arguments for event commands
#[derive(Debug, Args)]
pub struct EventArgs {
    /// Event subcommand
    #[command(subcommand)]
    pub command: EventCommand,
}

/// Event subcommands
#[derive(Debug, Subcommand)]
pub enum EventCommand {
    /// Create an event under a signed contract
    Create {
        /// Event name
        #[arg(long)]
        name: String,
        /// Contract id (must be signed)
        #[arg(long)]
        contract_id: i64,
        /// Client id
        #[arg(long)]
        client_id: i64,
        /// Support staff id to assign
        #[arg(long)]
        assignee_id: Option<i64>,
        /// Start, as "YYYY-MM-DD HH:MM" (UTC)
        #[arg(long)]
        starts_at: String,
        /// End, as "YYYY-MM-DD HH:MM" (UTC)
        #[arg(long)]
        ends_at: String,
        /// Venue or address
        #[arg(long)]
        location: Option<String>,
        /// Expected attendee count
        #[arg(long)]
        attendees: Option<i64>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Update an event
    Update {
        /// Event id
        id: i64,
        /// New event name
        #[arg(long)]
        name: Option<String>,
        /// New start, as "YYYY-MM-DD HH:MM" (UTC)
        #[arg(long)]
        starts_at: Option<String>,
        /// New end, as "YYYY-MM-DD HH:MM" (UTC)
        #[arg(long)]
        ends_at: Option<String>,
        /// New venue or address
        #[arg(long)]
        location: Option<String>,
        /// New attendee count
        #[arg(long)]
        attendees: Option<i64>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
        /// New support assignee (management only)
        #[arg(long)]
        assignee_id: Option<i64>,
    },
    /// List events
    List {
        /// Only events with no support assignee
        #[arg(long)]
        unassigned: bool,
        /// Only events assigned to the logged-in user
        #[arg(long)]
        mine: bool,
    },
}

/// Event display row for table output
#[derive(Debug, Serialize, Tabled)]
struct EventRow {
    /// Event id
    id: i64,
    /// Event name
    name: String,
    /// Start time
    starts: String,
    /// End time
    ends: String,
    /// Location
    location: String,
    /// Assigned support staff id
    assignee: String,
}

/// Parse a "YYYY-MM-DD HH:MM" timestamp as UTC.
fn parse_datetime(value: &str) -> Result<DateTime<Utc>, AppError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .map(|dt| dt.and_utc())
        .map_err(|_| {
            AppError::validation(format!(
                "Invalid timestamp '{value}'; expected \"YYYY-MM-DD HH:MM\""
            ))
        })
}

/// Execute event commands
pub async fn execute(
    args: &EventArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::open_pool(config).await?;
    let service = EventService::new(Arc::new(FieldPolicy::new()));

    match &args.command {
        EventCommand::Create {
            name,
            contract_id,
            client_id,
            assignee_id,
            starts_at,
            ends_at,
            location,
            attendees,
            notes,
        } => {
            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let event = service
                .create(
                    &mut uow,
                    &ctx,
                    CreateEventRequest {
                        name: name.clone(),
                        contract_id: *contract_id,
                        client_id: *client_id,
                        assignee_id: *assignee_id,
                        starts_at: parse_datetime(starts_at)?,
                        ends_at: parse_datetime(ends_at)?,
                        location: location.clone(),
                        attendees: *attendees,
                        notes: notes.clone(),
                    },
                )
                .await?;
            uow.commit().await?;
            output::print_success(&format!("Event '{}' created (id {})", event.name, event.id));
        }
        EventCommand::Update {
            id,
            name,
            starts_at,
            ends_at,
            location,
            attendees,
            notes,
            assignee_id,
        } => {
            let patch = EventPatch {
                name: name.clone(),
                starts_at: starts_at.as_deref().map(parse_datetime).transpose()?,
                ends_at: ends_at.as_deref().map(parse_datetime).transpose()?,
                location: location.clone(),
                attendees: *attendees,
                notes: notes.clone(),
                assignee_id: *assignee_id,
            };

            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let event = service.update(&mut uow, &ctx, *id, patch).await?;
            uow.commit().await?;
            output::print_success(&format!("Event {} updated", event.id));
        }
        EventCommand::List { unassigned, mine } => {
            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let events = service.list(&mut uow, &ctx, *unassigned, *mine).await?;
            uow.commit().await?;

            let rows: Vec<EventRow> = events
                .iter()
                .map(|e| EventRow {
                    id: e.id,
                    name: e.name.clone(),
                    starts: e.starts_at.format("%Y-%m-%d %H:%M").to_string(),
                    ends: e.ends_at.format("%Y-%m-%d %H:%M").to_string(),
                    location: e.location.clone().unwrap_or_default(),
                    assignee: e
                        .assignee_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
