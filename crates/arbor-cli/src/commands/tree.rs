//! Whole-tree command.

use clap::Args;

use arbor_core::config::AppConfig;
use arbor_core::error::AppError;
use arbor_service::RequestContext;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Owner whose tree to print
    #[arg(short, long)]
    pub user: String,
}

/// Print the owner's nested tree
pub async fn execute(
    args: &TreeArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let services = Services::connect(config).await?;
    let ctx = RequestContext::for_user(&args.user);

    let tree = services.trees.get_tree(&ctx).await?;
    output::print_tree(&tree, format);

    services.close().await;
    Ok(())
}
