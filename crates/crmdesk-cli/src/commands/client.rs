//! Client management commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crmdesk_auth::FieldPolicy;
use crmdesk_core::config::AppConfig;
use crmdesk_core::error::AppError;
use crmdesk_database::UnitOfWork;
use crmdesk_entity::client::ClientPatch;
use crmdesk_service::{ClientService, CreateClientRequest};

use crate::output::{self, OutputFormat};

/// Arguments for client commands
#[derive(Debug, Args)]
pub struct ClientArgs {
    /// Client subcommand
    #[command(subcommand)]
    pub command: ClientCommand,
}

/// Client subcommands
#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    /// Create a client (owned by the logged-in sales user)
    Create {
        /// Given name
        #[arg(long)]
        first_name: String,
        /// Family name
        #[arg(long)]
        last_name: String,
        /// Email
        #[arg(long)]
        email: String,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
        /// Company name
        #[arg(long)]
        company: Option<String>,
    },
    /// Update a client
    Update {
        /// Client id
        id: i64,
        /// New given name
        #[arg(long)]
        first_name: Option<String>,
        /// New family name
        #[arg(long)]
        last_name: Option<String>,
        /// New email
        #[arg(long)]
        email: Option<String>,
        /// New phone number
        #[arg(long)]
        phone: Option<String>,
        /// New company name
        #[arg(long)]
        company: Option<String>,
        /// New owner (sales staff id; management only)
        #[arg(long)]
        owner_id: Option<i64>,
    },
    /// List clients
    List {
        /// Only clients owned by the logged-in user
        #[arg(long)]
        mine: bool,
    },
}

/// Client display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ClientRow {
    /// Client id
    id: i64,
    /// Full name
    name: String,
    /// Email
    email: String,
    /// Phone
    phone: String,
    /// Company
    company: String,
    /// Owning sales staff id
    owner: i64,
}

/// Execute client commands
pub async fn execute(
    args: &ClientArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::open_pool(config).await?;
    let service = ClientService::new(Arc::new(FieldPolicy::new()));

    match &args.command {
        ClientCommand::Create {
            first_name,
            last_name,
            email,
            phone,
            company,
        } => {
            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let client = service
                .create(
                    &mut uow,
                    &ctx,
                    CreateClientRequest {
                        first_name: first_name.clone(),
                        last_name: last_name.clone(),
                        email: email.clone(),
                        phone: phone.clone(),
                        company: company.clone(),
                    },
                )
                .await?;
            uow.commit().await?;
            output::print_success(&format!(
                "Client '{} {}' created (id {})",
                client.first_name, client.last_name, client.id
            ));
        }
        ClientCommand::Update {
            id,
            first_name,
            last_name,
            email,
            phone,
            company,
            owner_id,
        } => {
            let patch = ClientPatch {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                company: company.clone(),
                owner_id: *owner_id,
            };

            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let client = service.update(&mut uow, &ctx, *id, patch).await?;
            uow.commit().await?;
            output::print_success(&format!("Client {} updated", client.id));
        }
        ClientCommand::List { mine } => {
            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let clients = service.list(&mut uow, &ctx, *mine).await?;
            uow.commit().await?;

            let rows: Vec<ClientRow> = clients
                .iter()
                .map(|c| ClientRow {
                    id: c.id,
                    name: format!("{} {}", c.first_name, c.last_name),
                    email: c.email.clone(),
                    phone: c.phone.clone().unwrap_or_default(),
                    company: c.company.clone().unwrap_or_default(),
                    owner: c.owner_id,
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
