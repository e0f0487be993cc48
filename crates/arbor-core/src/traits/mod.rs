//! Traits defined in `arbor-core` and implemented by collaborator crates.

pub mod storage;

pub use storage::StorageProvider;
