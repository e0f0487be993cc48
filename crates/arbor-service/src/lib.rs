//! # arbor-service
//!
//! Use-case layer for Arbor. Each service validates input, scopes the call
//! to the principal in the [`RequestContext`], and orchestrates the
//! hierarchy store and the blob store.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod context;
pub mod file;
pub mod folder;
pub mod user;

pub use context::RequestContext;
pub use file::FileService;
pub use folder::{FolderService, TreeAssembler, TreeService};
pub use user::IdentityRegistry;
