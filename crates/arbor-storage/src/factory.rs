//! Provider selection from configuration.

use std::sync::Arc;

use tracing::info;

use arbor_core::config::StorageConfig;
use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_core::traits::StorageProvider;

use crate::providers::{LocalStorageProvider, MemoryStorageProvider};
use crate::signing::UrlSigner;

/// Build the provider named by `config.provider`.
pub async fn provider_from_config(config: &StorageConfig) -> AppResult<Arc<dyn StorageProvider>> {
    let signer = UrlSigner::new(&config.public_base_url, &config.signing_secret);
    let provider: Arc<dyn StorageProvider> = match config.provider.as_str() {
        "local" => Arc::new(LocalStorageProvider::new(&config.root_path, signer).await?),
        "memory" => Arc::new(MemoryStorageProvider::new(signer)),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{other}'"
            )));
        }
    };
    info!(provider = provider.provider_type(), "Storage provider ready");
    Ok(provider)
}
