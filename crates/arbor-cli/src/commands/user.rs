//! User registration commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use arbor_auth::Principal;
use arbor_core::config::AppConfig;
use arbor_core::error::AppError;
use arbor_entity::user::User;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a principal unless it already exists
    Ensure {
        /// Identity provider subject
        #[arg(long)]
        id: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Avatar URL
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Verify a bearer token and register its principal
    Whoami {
        /// Bearer token issued by the identity provider
        #[arg(long, env = "ARBOR_TOKEN")]
        token: String,
    },
}

/// User display row
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    email: String,
    #[tabled(rename = "name")]
    full_name: String,
    created: bool,
    created_at: String,
}

impl UserRow {
    fn new(user: &User, created: bool) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone().unwrap_or_default(),
            created,
            created_at: user.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let services = Services::connect(config).await?;

    let principal = match &args.command {
        UserCommand::Ensure {
            id,
            email,
            name,
            avatar,
        } => Principal {
            id: id.clone(),
            email: Some(email.clone()),
            full_name: name.clone(),
            avatar_url: avatar.clone(),
        },
        UserCommand::Whoami { token } => services.decoder.decode(token)?,
    };

    let ensured = services.registry.ensure_user(&principal).await?;
    output::print_item(&UserRow::new(&ensured.user, ensured.created), format);

    services.close().await;
    Ok(())
}
