//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A principal mirrored from the external identity provider.
///
/// The identifier is issued by the provider and never changes; the profile
/// fields may be updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Opaque identifier issued by the identity provider.
    pub id: String,
    /// Email address reported by the provider.
    pub email: String,
    /// Human-readable display name.
    pub full_name: Option<String>,
    /// Reference to the user's avatar image.
    pub avatar_url: Option<String>,
    /// When the user was first registered.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Identity fields supplied at first sight of a principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Provider-issued identifier.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Display name (optional).
    pub full_name: Option<String>,
    /// Avatar reference (optional).
    pub avatar_url: Option<String>,
}

/// Profile changes for an existing user. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New email address.
    pub email: Option<String>,
    /// New display name.
    pub full_name: Option<String>,
    /// New avatar reference.
    pub avatar_url: Option<String>,
}
