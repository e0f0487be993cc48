//! # arbor-entity
//!
//! Domain entity models for Arbor. Every struct in this crate represents a
//! database table row or a domain value object. Row entities additionally
//! derive `sqlx::FromRow`.

pub mod file;
pub mod filter;
pub mod folder;
pub mod name;
pub mod user;

pub use file::File;
pub use filter::ParentFilter;
pub use folder::{FilesystemTree, Folder, FolderNode};
pub use user::User;

use serde::{Deserialize, Deserializer};

/// Deserialize a present field (including an explicit `null`) as `Some`.
///
/// Paired with `#[serde(default)]` this lets `Option<Option<T>>` tell
/// "field absent" (`None`) from "field set to null" (`Some(None)`).
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
