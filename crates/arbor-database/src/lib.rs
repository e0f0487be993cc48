//! # arbor-database
//!
//! The Hierarchy Store: the authoritative folder/file/user model with its
//! uniqueness, ownership, acyclicity, and cascade rules.
//!
//! Two implementations share the [`HierarchyStore`] and [`UserDirectory`]
//! contracts: [`PgStore`] on PostgreSQL and [`MemoryStore`] for tests and
//! embedding. Both run every mutation's validation and write atomically.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;
pub mod rules;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{EnsuredUser, HierarchySnapshot, HierarchyStore, UserDirectory};
