//! Row-level access policy.
//!
//! A principal may read or mutate a folder or file only when it owns the
//! row. The check is a pure predicate with no state; both store
//! implementations call it on the target row and on every row an operation
//! references indirectly (parent folder, containing folder).

pub mod owner;

pub use owner::{Owned, authorize, require_owned};
