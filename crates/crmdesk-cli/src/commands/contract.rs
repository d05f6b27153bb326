//! Contract management commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crmdesk_auth::FieldPolicy;
use crmdesk_core::config::AppConfig;
use crmdesk_core::error::AppError;
use crmdesk_database::UnitOfWork;
use crmdesk_entity::contract::ContractPatch;
use crmdesk_service::{ContractService, CreateContractRequest};

use crate::output::{self, OutputFormat};

/// Arguments for contract commands
#[derive(Debug, Args)]
pub struct ContractArgs {
    /// Contract subcommand
    #[command(subcommand)]
    pub command: ContractCommand,
}

/// Contract subcommands
#[derive(Debug, Subcommand)]
pub enum ContractCommand {
    /// Create a contract for an existing client
    Create {
        /// Client id
        #[arg(long)]
        client_id: i64,
        /// Owning sales staff id (required for management; sales own their
        /// contracts automatically)
        #[arg(long)]
        owner_id: Option<i64>,
        /// Total amount
        #[arg(long)]
        total_amount: f64,
        /// Amount still due
        #[arg(long)]
        amount_due: f64,
        /// Mark the contract signed at creation
        #[arg(long)]
        signed: bool,
    },
    /// Update a contract
    Update {
        /// Contract id
        id: i64,
        /// New total amount
        #[arg(long)]
        total_amount: Option<f64>,
        /// New amount due
        #[arg(long)]
        amount_due: Option<f64>,
        /// New signature state (true or false)
        #[arg(long)]
        signed: Option<bool>,
        /// New owner (sales staff id; management only)
        #[arg(long)]
        owner_id: Option<i64>,
    },
    /// List contracts
    List {
        /// Only unsigned contracts
        #[arg(long)]
        unsigned: bool,
        /// Only contracts with an outstanding balance
        #[arg(long)]
        unpaid: bool,
        /// Only contracts owned by the logged-in user
        #[arg(long)]
        mine: bool,
    },
}

/// Contract display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ContractRow {
    /// Contract id
    id: i64,
    /// Client id
    client: i64,
    /// Owning sales staff id
    owner: i64,
    /// Total amount
    total: f64,
    /// Amount due
    due: f64,
    /// Signed flag
    signed: bool,
}

/// Execute contract commands
pub async fn execute(
    args: &ContractArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::open_pool(config).await?;
    let service = ContractService::new(Arc::new(FieldPolicy::new()));

    match &args.command {
        ContractCommand::Create {
            client_id,
            owner_id,
            total_amount,
            amount_due,
            signed,
        } => {
            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let contract = service
                .create(
                    &mut uow,
                    &ctx,
                    CreateContractRequest {
                        client_id: *client_id,
                        owner_id: *owner_id,
                        total_amount: *total_amount,
                        amount_due: *amount_due,
                        is_signed: *signed,
                    },
                )
                .await?;
            uow.commit().await?;
            output::print_success(&format!("Contract {} created", contract.id));
        }
        ContractCommand::Update {
            id,
            total_amount,
            amount_due,
            signed,
            owner_id,
        } => {
            let patch = ContractPatch {
                total_amount: *total_amount,
                amount_due: *amount_due,
                is_signed: *signed,
                owner_id: *owner_id,
            };

            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let contract = service.update(&mut uow, &ctx, *id, patch).await?;
            uow.commit().await?;
            output::print_success(&format!("Contract {} updated", contract.id));
        }
        ContractCommand::List {
            unsigned,
            unpaid,
            mine,
        } => {
            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let contracts = service
                .list(&mut uow, &ctx, *unsigned, *unpaid, *mine)
                .await?;
            uow.commit().await?;

            let rows: Vec<ContractRow> = contracts
                .iter()
                .map(|c| ContractRow {
                    id: c.id,
                    client: c.client_id,
                    owner: c.owner_id,
                    total: c.total_amount,
                    due: c.amount_due,
                    signed: c.is_signed,
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
