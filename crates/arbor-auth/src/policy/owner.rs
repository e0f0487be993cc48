//! Ownership predicate and the not-found mapping for denied access.

use tracing::warn;

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_entity::file::File;
use arbor_entity::folder::Folder;

/// An entity owned by exactly one user.
pub trait Owned {
    /// The owning user's identifier.
    fn owner_id(&self) -> &str;
}

impl<T: Owned + ?Sized> Owned for &T {
    fn owner_id(&self) -> &str {
        (**self).owner_id()
    }
}

impl Owned for Folder {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

impl Owned for File {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// Whether `principal_id` may act on `entity`.
pub fn authorize<T: Owned + ?Sized>(principal_id: &str, entity: &T) -> bool {
    !principal_id.is_empty() && entity.owner_id() == principal_id
}

/// Resolve a looked-up row into one the principal owns.
///
/// A missing row and a row owned by someone else produce the same
/// `NotFound` error so that a non-owner cannot learn the row exists.
pub fn require_owned<T: Owned>(
    principal_id: &str,
    entity: Option<T>,
    what: &str,
    id: impl std::fmt::Display,
) -> AppResult<T> {
    match entity {
        Some(entity) if authorize(principal_id, &entity) => Ok(entity),
        Some(entity) => {
            warn!(
                principal_id,
                owner_id = entity.owner_id(),
                entity = what,
                id = %id,
                "Denied access to entity outside principal's scope"
            );
            Err(AppError::not_found(format!("{what} not found")))
        }
        None => Err(AppError::not_found(format!("{what} not found"))),
    }
}
