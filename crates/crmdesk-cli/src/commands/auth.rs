//! Login, logout, and whoami commands.

use clap::Args;

use crmdesk_auth::SessionResolver;
use crmdesk_auth::jwt::TokenDecoder;
use crmdesk_core::config::AppConfig;
use crmdesk_core::error::AppError;
use crmdesk_database::UnitOfWork;
use crmdesk_service::AuthService;

use crate::output;
use crate::token;

/// Arguments for the login command
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username or email (will prompt if not provided)
    #[arg(short, long)]
    pub user: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Authenticate and store the issued bearer credential
pub async fn login(args: &LoginArgs, config: &AppConfig) -> Result<(), AppError> {
    let identifier = super::prompt_text(&args.user, "Username or email")?;
    let password = super::prompt_password(&args.password, "Password", false)?;

    let pool = super::open_pool(config).await?;
    let mut uow = UnitOfWork::begin(&pool).await?;
    let (credential, principal) = AuthService::new(&config.auth)
        .login(&mut uow, &identifier, &password)
        .await?;
    uow.commit().await?;

    token::write(&credential)?;
    output::print_success(&format!(
        "Logged in as {} ({})",
        principal.display_name, principal.role
    ));
    Ok(())
}

/// Delete the stored credential
pub fn logout() -> Result<(), AppError> {
    token::clear()?;
    output::print_success("Logged out");
    Ok(())
}

/// Show the identity behind the stored credential
pub async fn whoami(config: &AppConfig) -> Result<(), AppError> {
    let pool = super::open_pool(config).await?;
    let mut uow = UnitOfWork::begin(&pool).await?;

    let stored = token::read()?;
    let resolver = SessionResolver::new(TokenDecoder::new(&config.auth));
    match resolver.resolve(uow.conn(), stored.as_deref()).await? {
        Some(principal) => {
            output::print_kv("id", &principal.id.to_string());
            output::print_kv("username", &principal.username);
            output::print_kv("name", &principal.display_name);
            output::print_kv("role", principal.role.as_str());
        }
        None => output::print_warning("Not authenticated"),
    }
    Ok(())
}
