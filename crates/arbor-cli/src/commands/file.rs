//! File management commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use arbor_core::config::AppConfig;
use arbor_core::error::{AppError, ErrorKind};
use arbor_entity::ParentFilter;
use arbor_entity::file::File;

use super::Services;
use super::folder::context;
use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// Acting user
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// List files at the root, in a folder, or everywhere
    List {
        /// Folder ID (omit for root)
        #[arg(short, long, conflicts_with = "all")]
        folder: Option<Uuid>,
        /// List every file regardless of folder
        #[arg(long)]
        all: bool,
    },
    /// Upload a local file
    Upload {
        /// Local file to upload
        path: PathBuf,
        /// Name to store it under (defaults to the local file name)
        #[arg(short, long)]
        name: Option<String>,
        /// Target folder ID (omit for root)
        #[arg(short, long)]
        folder: Option<Uuid>,
    },
    /// Download a file's contents to a local path
    Download {
        /// File ID
        id: Uuid,
        /// Destination path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Rename, move, or replace the contents of a file
    Update {
        /// File ID
        id: Uuid,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New folder ID
        #[arg(short, long, conflicts_with = "to_root")]
        folder: Option<Uuid>,
        /// Move the file to the root
        #[arg(long)]
        to_root: bool,
        /// Local file whose bytes replace the current contents
        #[arg(long)]
        content: Option<PathBuf>,
    },
    /// Delete a file
    Delete {
        /// File ID
        id: Uuid,
    },
    /// Print a time-limited download URL
    Url {
        /// File ID
        id: Uuid,
        /// Lifetime in seconds (defaults to storage.signed_url_ttl_seconds)
        #[arg(long)]
        ttl: Option<u64>,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    id: String,
    name: String,
    folder: String,
    storage_path: String,
    updated_at: String,
}

impl From<&File> for FileRow {
    fn from(f: &File) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            folder: f.folder_id.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
            storage_path: f.storage_path.clone(),
            updated_at: f.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

async fn read_local(path: &Path) -> Result<Bytes, AppError> {
    tokio::fs::read(path).await.map(Bytes::from).map_err(|e| {
        AppError::with_source(
            ErrorKind::Validation,
            format!("Cannot read {}: {e}", path.display()),
            e,
        )
    })
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = context(args.user.as_deref())?;
    let services = Services::connect(config).await?;

    match &args.command {
        FileCommand::List { folder, all } => {
            let filter = if *all {
                ParentFilter::Any
            } else {
                ParentFilter::from_parent(*folder)
            };
            let files = services.files.list_files(&ctx, filter).await?;
            let rows: Vec<FileRow> = files.iter().map(FileRow::from).collect();
            output::print_list(&rows, format);
        }
        FileCommand::Upload { path, name, folder } => {
            let name = match name {
                Some(name) => name.clone(),
                None => path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| AppError::validation("Pass --name for this path"))?,
            };
            let data = read_local(path).await?;
            let file = services
                .files
                .upload_file(&ctx, &name, *folder, data)
                .await?;
            output::print_item(&FileRow::from(&file), format);
        }
        FileCommand::Download { id, output: dest } => {
            let (file, data) = services.files.download_file(&ctx, *id).await?;
            tokio::fs::write(dest, &data).await?;
            output::print_success(&format!(
                "Saved '{}' ({} bytes) to {}",
                file.name,
                data.len(),
                dest.display()
            ));
        }
        FileCommand::Update {
            id,
            name,
            folder,
            to_root,
            content,
        } => {
            let folder_id = match (folder, to_root) {
                (_, true) => Some(None),
                (Some(f), false) => Some(Some(*f)),
                (None, false) => None,
            };
            if name.is_none() && folder_id.is_none() && content.is_none() {
                return Err(AppError::validation(
                    "Nothing to update: pass --name, --folder, --to-root, or --content",
                ));
            }

            let mut file = None;
            if name.is_some() || folder_id.is_some() {
                file = Some(
                    services
                        .files
                        .rename_or_move_file(&ctx, *id, name.as_deref(), folder_id)
                        .await?,
                );
            }
            if let Some(content) = content {
                let data = read_local(content).await?;
                file = Some(services.files.replace_content(&ctx, *id, data).await?);
            }
            if let Some(file) = file {
                output::print_item(&FileRow::from(&file), format);
            }
        }
        FileCommand::Delete { id } => {
            let file = services.files.delete_file(&ctx, *id).await?;
            output::print_success(&format!("Deleted '{}'", file.name));
        }
        FileCommand::Url { id, ttl } => {
            let signed = services
                .files
                .file_url(&ctx, *id, ttl.map(Duration::from_secs))
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&signed),
                OutputFormat::Table => {
                    println!("{}", signed.url);
                    output::print_kv("Expires", &signed.expires_at.to_rfc3339());
                }
            }
        }
    }

    services.close().await;
    Ok(())
}
