//! Verified identities supplied by the external identity provider.

pub mod claims;
pub mod decoder;

pub use claims::{ProviderClaims, UserMetadata};
pub use decoder::PrincipalDecoder;

use serde::{Deserialize, Serialize};

/// An authenticated external identity making requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Provider-issued identifier; becomes the owner of everything created.
    pub id: String,
    /// Email address, when the provider supplies one.
    pub email: Option<String>,
    /// Display name, when known.
    pub full_name: Option<String>,
    /// Avatar reference, when known.
    pub avatar_url: Option<String>,
}

impl Principal {
    /// Create a principal carrying only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            full_name: None,
            avatar_url: None,
        }
    }

    /// Attach an email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl From<ProviderClaims> for Principal {
    fn from(claims: ProviderClaims) -> Self {
        let metadata = claims.user_metadata.unwrap_or_default();
        Self {
            id: claims.sub,
            email: claims.email,
            full_name: metadata.full_name.or(metadata.name),
            avatar_url: metadata.avatar_url.or(metadata.picture),
        }
    }
}
