//! Claims carried by identity-provider access tokens.

use serde::{Deserialize, Serialize};

/// Token payload issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderClaims {
    /// Subject: the principal identifier.
    pub sub: String,
    /// Audience the token was minted for.
    pub aud: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Provider-managed profile fields.
    #[serde(default)]
    pub user_metadata: Option<UserMetadata>,
}

/// Free-form profile block; different sign-in methods fill different keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Display name set by password sign-up.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Display name set by OAuth providers.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar set by password sign-up.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Avatar set by OAuth providers.
    #[serde(default)]
    pub picture: Option<String>,
}
