//! Folder management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use arbor_core::config::AppConfig;
use arbor_core::error::AppError;
use arbor_entity::ParentFilter;
use arbor_entity::folder::{Folder, UpdateFolder};
use arbor_service::RequestContext;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Acting user
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List folders at the root, under a parent, or everywhere
    List {
        /// Parent folder ID (omit for root)
        #[arg(short, long, conflicts_with = "all")]
        parent: Option<Uuid>,
        /// List every folder regardless of parent
        #[arg(long)]
        all: bool,
    },
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent: Option<Uuid>,
    },
    /// Rename and/or move a folder
    Update {
        /// Folder ID
        id: Uuid,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New parent folder ID
        #[arg(short, long, conflicts_with = "to_root")]
        parent: Option<Uuid>,
        /// Move the folder to the root
        #[arg(long)]
        to_root: bool,
    },
    /// Delete a folder and everything inside it
    Delete {
        /// Folder ID
        id: Uuid,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    id: String,
    name: String,
    parent: String,
    updated_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            parent: f.parent_id.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
            updated_at: f.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Resolve the acting user from `--user`.
pub(crate) fn context(user: Option<&str>) -> Result<RequestContext, AppError> {
    match user.map(str::trim) {
        Some(user) if !user.is_empty() => Ok(RequestContext::for_user(user)),
        _ => Err(AppError::validation("--user is required")),
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = context(args.user.as_deref())?;
    let services = Services::connect(config).await?;

    match &args.command {
        FolderCommand::List { parent, all } => {
            let filter = if *all {
                ParentFilter::Any
            } else {
                ParentFilter::from_parent(*parent)
            };
            let folders = services.folders.list_folders(&ctx, filter).await?;
            let rows: Vec<FolderRow> = folders.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Create { name, parent } => {
            let folder = services.folders.create_folder(&ctx, name, *parent).await?;
            output::print_item(&FolderRow::from(&folder), format);
        }
        FolderCommand::Update {
            id,
            name,
            parent,
            to_root,
        } => {
            let parent_id = match (parent, to_root) {
                (_, true) => Some(None),
                (Some(p), false) => Some(Some(*p)),
                (None, false) => None,
            };
            let update = UpdateFolder {
                name: name.clone(),
                parent_id,
            };
            if update.is_empty() {
                return Err(AppError::validation(
                    "Nothing to update: pass --name, --parent, or --to-root",
                ));
            }
            let folder = services
                .folders
                .rename_or_move_folder(&ctx, *id, update)
                .await?;
            output::print_item(&FolderRow::from(&folder), format);
        }
        FolderCommand::Delete { id } => {
            let deleted = services.folders.delete_folder(&ctx, *id).await?;
            match format {
                OutputFormat::Json => output::print_json(&deleted),
                OutputFormat::Table => output::print_success(&format!(
                    "Deleted '{}': {} folder(s) and {} file(s) removed",
                    deleted.folder.name, deleted.removed_folders, deleted.removed_files
                )),
            }
        }
    }

    services.close().await;
    Ok(())
}
