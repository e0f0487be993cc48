//! Mirrors authenticated principals into local user records.

use std::sync::Arc;

use tracing::info;

use arbor_auth::Principal;
use arbor_core::error::AppError;
use arbor_database::{EnsuredUser, UserDirectory};
use arbor_entity::user::{NewUser, UpdateUser, User};

use crate::context::RequestContext;

/// Registers principals on first sight.
///
/// The authentication boundary calls [`ensure_user`](Self::ensure_user)
/// after verifying a principal and before any hierarchy operation.
#[derive(Debug, Clone)]
pub struct IdentityRegistry {
    users: Arc<dyn UserDirectory>,
}

impl IdentityRegistry {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Create the principal's user record unless it already exists.
    ///
    /// An existing record is returned as stored; profile fields supplied
    /// now do not overwrite it.
    pub async fn ensure_user(&self, principal: &Principal) -> Result<EnsuredUser, AppError> {
        if principal.id.trim().is_empty() {
            return Err(AppError::validation("Principal identifier cannot be empty"));
        }
        let email = principal
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::validation("Principal has no email address"))?;

        let ensured = self
            .users
            .ensure_user(&NewUser {
                id: principal.id.clone(),
                email: email.to_string(),
                full_name: principal.full_name.clone(),
                avatar_url: principal.avatar_url.clone(),
            })
            .await?;

        if ensured.created {
            info!(user_id = %ensured.user.id, "Registered new principal");
        }
        Ok(ensured)
    }

    /// The caller's own user record.
    pub async fn current_user(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.users
            .find_user(ctx.owner())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Update the caller's mutable profile fields.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        update: UpdateUser,
    ) -> Result<User, AppError> {
        if let Some(email) = &update.email {
            if email.trim().is_empty() {
                return Err(AppError::validation("Email cannot be empty"));
            }
        }
        self.users.update_profile(ctx.owner(), &update).await
    }
}
