//! # arbor-storage
//!
//! Blob store collaborators for Arbor. File bytes live behind a
//! [`StorageProvider`](arbor_core::traits::StorageProvider); the hierarchy
//! only keeps the opaque storage path.

pub mod factory;
pub mod paths;
pub mod providers;
pub mod signing;

pub use factory::provider_from_config;
pub use providers::{LocalStorageProvider, MemoryStorageProvider};
pub use signing::UrlSigner;
