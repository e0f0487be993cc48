//! Connectivity checks for the database and blob store.

use serde::Serialize;
use tabled::Tabled;

use arbor_core::config::AppConfig;
use arbor_core::error::AppError;
use arbor_database::DatabasePool;

use crate::output::{self, OutputFormat};

/// One checked component
#[derive(Debug, Serialize, Tabled)]
struct HealthRow {
    /// Component name
    component: String,
    /// "ok" or the failure
    status: String,
}

impl HealthRow {
    fn new(component: &str, result: Result<bool, AppError>) -> Self {
        let status = match result {
            Ok(true) => "ok".to_string(),
            Ok(false) => "unhealthy".to_string(),
            Err(e) => e.message,
        };
        Self {
            component: component.to_string(),
            status,
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Check the database and the configured blob store.
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let database = match DatabasePool::connect(&config.database).await {
        Ok(pool) => {
            let result = pool.health_check().await;
            pool.close().await;
            result
        }
        Err(e) => Err(e),
    };
    let storage = match arbor_storage::provider_from_config(&config.storage).await {
        Ok(provider) => provider.health_check().await,
        Err(e) => Err(e),
    };

    let rows = [
        HealthRow::new("database", database),
        HealthRow::new("storage", storage),
    ];
    output::print_list(&rows, format);
    if rows.iter().all(HealthRow::is_ok) {
        Ok(())
    } else {
        Err(AppError::internal("One or more components are unhealthy"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_status() {
        assert!(HealthRow::new("database", Ok(true)).is_ok());
        assert_eq!(HealthRow::new("storage", Ok(false)).status, "unhealthy");

        let err = AppError::database("Health check failed");
        let failed = HealthRow::new("database", Err(err));
        assert!(!failed.is_ok());
        assert_eq!(failed.status, "Health check failed");
    }
}
