//! Database migration command.

use arbor_core::config::AppConfig;
use arbor_core::error::AppError;
use arbor_database::DatabasePool;
use arbor_database::migration::run_migrations;

use crate::output;

/// Apply all pending migrations.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    run_migrations(pool.pool()).await?;
    pool.close().await;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
