//! # arbor-core
//!
//! Core crate for Arbor. Contains the unified error system, configuration
//! schemas, and the traits implemented by external collaborators such as
//! the blob store.
//!
//! This crate has **no** internal dependencies on other Arbor crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
