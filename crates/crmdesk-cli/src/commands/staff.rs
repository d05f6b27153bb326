//! Staff account management commands.

use std::str::FromStr;
use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crmdesk_auth::FieldPolicy;
use crmdesk_auth::password::PasswordHasher;
use crmdesk_core::config::AppConfig;
use crmdesk_core::error::AppError;
use crmdesk_database::UnitOfWork;
use crmdesk_database::repositories::StaffRepository;
use crmdesk_entity::staff::{CreateStaffUser, Role, StaffPatch};
use crmdesk_service::{CreateStaffRequest, StaffService};

use crate::output::{self, OutputFormat};

/// Arguments for staff commands
#[derive(Debug, Args)]
pub struct StaffArgs {
    /// Staff subcommand
    #[command(subcommand)]
    pub command: StaffCommand,
}

/// Staff subcommands
#[derive(Debug, Subcommand)]
pub enum StaffCommand {
    /// Create the first management account (only on an empty directory)
    Bootstrap {
        /// Username
        #[arg(short, long)]
        username: Option<String>,
        /// Email
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create a staff user
    Create {
        /// Username
        #[arg(long)]
        username: String,
        /// Given name
        #[arg(long)]
        first_name: String,
        /// Family name
        #[arg(long)]
        last_name: String,
        /// Email
        #[arg(long)]
        email: String,
        /// Role: management, sales, or support
        #[arg(long)]
        role: String,
        /// Password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },
    /// Update a staff user
    Update {
        /// Staff user id
        id: i64,
        /// New username
        #[arg(long)]
        username: Option<String>,
        /// New given name
        #[arg(long)]
        first_name: Option<String>,
        /// New family name
        #[arg(long)]
        last_name: Option<String>,
        /// New email
        #[arg(long)]
        email: Option<String>,
        /// New role: management, sales, or support
        #[arg(long)]
        role: Option<String>,
    },
    /// Reset a staff user's password
    SetPassword {
        /// Staff user id
        id: i64,
        /// New password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete a staff user
    Delete {
        /// Staff user id
        id: i64,
    },
    /// List staff users
    List {
        /// Filter by role
        #[arg(short, long)]
        role: Option<String>,
    },
}

/// Staff display row for table output
#[derive(Debug, Serialize, Tabled)]
struct StaffRow {
    /// Staff id
    id: i64,
    /// Username
    username: String,
    /// Display name
    name: String,
    /// Email
    email: String,
    /// Role
    role: String,
}

/// Execute staff commands
pub async fn execute(
    args: &StaffArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::open_pool(config).await?;
    let service = StaffService::new(Arc::new(FieldPolicy::new()));

    match &args.command {
        StaffCommand::Bootstrap {
            username,
            email,
            password,
        } => {
            let username = super::prompt_text(username, "Management username")?;
            let email = super::prompt_text(email, "Management email")?;
            let password = super::prompt_password(password, "Password", true)?;

            let mut uow = UnitOfWork::begin(&pool).await?;
            if StaffRepository::count(uow.conn()).await? > 0 {
                return Err(AppError::validation(
                    "Staff users already exist; bootstrap only works on an empty directory",
                ));
            }
            let password_hash = PasswordHasher::new().hash_password(&password)?;
            let staff = StaffRepository::insert(
                uow.conn(),
                &CreateStaffUser {
                    username: username.clone(),
                    first_name: username.clone(),
                    last_name: "Admin".to_string(),
                    email,
                    password_hash,
                    role: Role::Management,
                },
            )
            .await?;
            uow.commit().await?;
            output::print_success(&format!(
                "Management user '{}' created (id {})",
                staff.username, staff.id
            ));
        }
        StaffCommand::Create {
            username,
            first_name,
            last_name,
            email,
            role,
            password,
        } => {
            let role = Role::from_str(role)?;
            let password = super::prompt_password(password, "Password", true)?;

            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let staff = service
                .create(
                    &mut uow,
                    &ctx,
                    CreateStaffRequest {
                        username: username.clone(),
                        first_name: first_name.clone(),
                        last_name: last_name.clone(),
                        email: email.clone(),
                        password,
                        role,
                    },
                )
                .await?;
            uow.commit().await?;
            output::print_success(&format!(
                "Staff user '{}' created (id {})",
                staff.username, staff.id
            ));
        }
        StaffCommand::Update {
            id,
            username,
            first_name,
            last_name,
            email,
            role,
        } => {
            let patch = StaffPatch {
                username: username.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
                role: role.as_deref().map(Role::from_str).transpose()?,
            };

            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let staff = service.update(&mut uow, &ctx, *id, patch).await?;
            uow.commit().await?;
            output::print_success(&format!("Staff user {} updated", staff.id));
        }
        StaffCommand::SetPassword { id, password } => {
            let password = super::prompt_password(password, "New password", true)?;

            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            service.set_password(&mut uow, &ctx, *id, &password).await?;
            uow.commit().await?;
            output::print_success(&format!("Password reset for staff user {id}"));
        }
        StaffCommand::Delete { id } => {
            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            service.delete(&mut uow, &ctx, *id).await?;
            uow.commit().await?;
            output::print_success(&format!("Staff user {id} deleted"));
        }
        StaffCommand::List { role } => {
            let role = role.as_deref().map(Role::from_str).transpose()?;

            let mut uow = UnitOfWork::begin(&pool).await?;
            let ctx = super::resolve_context(config, &mut uow).await?;
            let staff = service.list(&mut uow, &ctx, role).await?;
            uow.commit().await?;

            let rows: Vec<StaffRow> = staff
                .iter()
                .map(|s| StaffRow {
                    id: s.id,
                    username: s.username.clone(),
                    name: s.display_name(),
                    email: s.email.clone(),
                    role: s.role.to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
