//! CLI command definitions and dispatch.

pub mod file;
pub mod folder;
pub mod health;
pub mod migrate;
pub mod tree;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use arbor_auth::PrincipalDecoder;
use arbor_core::config::AppConfig;
use arbor_core::error::AppError;
use arbor_database::{DatabasePool, HierarchyStore, PgStore, UserDirectory};
use arbor_service::{FileService, FolderService, IdentityRegistry, TreeService};

use crate::output::OutputFormat;

/// Arbor: per-user hierarchical file store
#[derive(Debug, Parser)]
#[command(name = "arbor", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (loads `config/{env}` on top of the base file)
    #[arg(short, long, env = "ARBOR_ENV")]
    pub env: Option<String>,

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
    /// Run pending database migrations
    Migrate,
    /// Check database and blob store connectivity
    Health,
    /// User registration and lookup
    User(user::UserArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// File management
    File(file::FileArgs),
    /// Print a user's complete tree
    Tree(tree::TreeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate => migrate::execute(config).await,
            Commands::Health => health::execute(config, self.format).await,
            Commands::User(args) => user::execute(args, config, self.format).await,
            Commands::Folder(args) => folder::execute(args, config, self.format).await,
            Commands::File(args) => file::execute(args, config, self.format).await,
            Commands::Tree(args) => tree::execute(args, config, self.format).await,
        }
    }
}

/// Services wired to PostgreSQL and the configured blob store.
pub struct Services {
    pub folders: FolderService,
    pub files: FileService,
    pub trees: TreeService,
    pub registry: IdentityRegistry,
    pub decoder: PrincipalDecoder,
    pool: DatabasePool,
}

impl Services {
    /// Connect to the database and blob store named in `config`.
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let pool = DatabasePool::connect(&config.database).await?;
        let storage = arbor_storage::provider_from_config(&config.storage).await?;

        let store = Arc::new(PgStore::new(&pool));
        let hierarchy: Arc<dyn HierarchyStore> = store.clone();
        let users: Arc<dyn UserDirectory> = store;

        Ok(Self {
            folders: FolderService::new(hierarchy.clone(), storage.clone()),
            files: FileService::new(
                hierarchy.clone(),
                storage,
                Duration::from_secs(config.storage.signed_url_ttl_seconds),
            ),
            trees: TreeService::new(hierarchy),
            registry: IdentityRegistry::new(users),
            decoder: PrincipalDecoder::new(&config.auth),
            pool,
        })
    }

    /// Release database connections.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_folder_update_to_root() {
        let id = uuid::Uuid::new_v4().to_string();
        let cli = Cli::try_parse_from([
            "arbor", "--format", "json", "folder", "--user", "alice", "update", &id, "--to-root",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Folder(args) => {
                assert_eq!(args.user.as_deref(), Some("alice"));
                assert!(matches!(
                    args.command,
                    folder::FolderCommand::Update { to_root: true, .. }
                ));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_health() {
        let cli = Cli::try_parse_from(["arbor", "--format", "json", "health"]).unwrap();
        assert!(matches!(cli.command, Commands::Health));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parent_and_to_root_conflict() {
        let id = uuid::Uuid::new_v4().to_string();
        let parent = uuid::Uuid::new_v4().to_string();
        let result = Cli::try_parse_from([
            "arbor", "folder", "--user", "alice", "update", &id, "--parent", &parent, "--to-root",
        ]);
        assert!(result.is_err());
    }
}
