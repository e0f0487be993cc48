//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Blob store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Provider to use: `"local"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Root directory for the local provider.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Base URL that signed retrieval links are issued under.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Secret used to sign retrieval links.
    #[serde(default = "default_signing_secret")]
    pub signing_secret: String,
    /// Default lifetime of a signed retrieval link.
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            root_path: default_root_path(),
            public_base_url: default_public_base_url(),
            signing_secret: default_signing_secret(),
            signed_url_ttl_seconds: default_signed_url_ttl(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_root_path() -> String {
    "./data/blobs".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/blobs".to_string()
}

fn default_signing_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_signed_url_ttl() -> u64 {
    3600
}
