//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! a TOML file, an optional environment overlay, and `ARBOR__*` environment
//! variables. Each sub-module represents a logical configuration section.

pub mod auth;
pub mod database;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Identity provider token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges the base file at `path`, an optional `config/{env}` overlay,
    /// and environment variables prefixed with `ARBOR__` (for example
    /// `ARBOR__DATABASE__URL`). Missing files are skipped.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("ARBOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("does/not/exist", None).expect("defaults should load");
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.storage.provider, "local");
        assert_eq!(config.storage.signed_url_ttl_seconds, 3600);
        assert_eq!(config.auth.jwt_audience, "authenticated");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("arbor-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("arbor.toml");
        std::fs::write(
            &path,
            "[database]\nurl = \"postgres://db/arbor\"\nmax_connections = 4\n\n\
             [storage]\nprovider = \"memory\"\n\n[logging]\nformat = \"pretty\"\n",
        )
        .unwrap();

        let config = AppConfig::load(path.to_str().unwrap(), None).unwrap();
        assert_eq!(config.database.url, "postgres://db/arbor");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.storage.provider, "memory");
        assert_eq!(config.logging.format, "pretty");

        std::fs::remove_dir_all(&dir).ok();
    }
}
