//! CLI command definitions and dispatch.

pub mod auth;
pub mod client;
pub mod contract;
pub mod event;
pub mod migrate;
pub mod staff;

use clap::{Parser, Subcommand};

use crmdesk_auth::SessionResolver;
use crmdesk_auth::jwt::TokenDecoder;
use crmdesk_auth::rbac::require_authenticated;
use crmdesk_core::config::AppConfig;
use crmdesk_core::error::AppError;
use crmdesk_database::{DatabasePool, UnitOfWork};
use crmdesk_service::RequestContext;

use crate::output::OutputFormat;
use crate::token;

/// CrmDesk — back-office records manager
#[derive(Debug, Parser)]
#[command(name = "crmdesk", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and store a bearer credential
    Login(auth::LoginArgs),
    /// Delete the stored bearer credential
    Logout,
    /// Show the identity behind the stored credential
    Whoami,
    /// Staff account management
    Staff(staff::StaffArgs),
    /// Client management
    Client(client::ClientArgs),
    /// Contract management
    Contract(contract::ContractArgs),
    /// Event management
    Event(event::EventArgs),
    /// Create or update the database schema
    Migrate,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config)?;
        match &self.command {
            Commands::Login(args) => auth::login(args, &config).await,
            Commands::Logout => auth::logout(),
            Commands::Whoami => auth::whoami(&config).await,
            Commands::Staff(args) => staff::execute(args, &config, self.format).await,
            Commands::Client(args) => client::execute(args, &config, self.format).await,
            Commands::Contract(args) => contract::execute(args, &config, self.format).await,
            Commands::Event(args) => event::execute(args, &config, self.format).await,
            Commands::Migrate => migrate::execute(&config).await,
        }
    }
}

/// Helper: open the database pool from config
pub async fn open_pool(config: &AppConfig) -> Result<sqlx::SqlitePool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

/// Helper: resolve the stored credential into an authenticated request
/// context. Authentication is decided here, before any command logic runs.
pub async fn resolve_context(
    config: &AppConfig,
    uow: &mut UnitOfWork,
) -> Result<RequestContext, AppError> {
    let stored = token::read()?;
    let resolver = SessionResolver::new(TokenDecoder::new(&config.auth));
    let principal = resolver.resolve(uow.conn(), stored.as_deref()).await?;
    let principal = require_authenticated(principal)?;
    Ok(RequestContext::new(principal))
}

/// Helper: prompt for a required text value when the flag was not given
pub fn prompt_text(flag: &Option<String>, prompt: &str) -> Result<String, AppError> {
    match flag {
        Some(value) => Ok(value.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}

/// Helper: prompt for a password when the flag was not given
pub fn prompt_password(flag: &Option<String>, prompt: &str, confirm: bool) -> Result<String, AppError> {
    match flag {
        Some(value) => Ok(value.clone()),
        None => {
            let mut input = dialoguer::Password::new().with_prompt(prompt);
            if confirm {
                input = input.with_confirmation("Confirm password", "Passwords do not match");
            }
            input
                .interact()
                .map_err(|e| AppError::internal(format!("Input error: {e}")))
        }
    }
}
