//! Identity provider token configuration.

use serde::{Deserialize, Serialize};

/// Settings for verifying bearer tokens issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC-SHA256 secret the provider signs tokens with.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected `aud` claim.
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
    /// Clock-skew leeway in seconds for `exp` checks.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_audience: default_jwt_audience(),
            leeway_seconds: default_leeway(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_audience() -> String {
    "authenticated".to_string()
}

fn default_leeway() -> u64 {
    5
}
