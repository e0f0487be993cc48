//! Local user records for authenticated principals.

pub mod registry;

pub use registry::IdentityRegistry;
